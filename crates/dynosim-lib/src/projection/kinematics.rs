//! Drag-strip and chassis kinematic correlations.
//!
//! This module turns projected power and weight into acceleration, braking,
//! and grip figures. The raw correlations are empirical drag-strip fits; the
//! full derivation anchors them to the vehicle's measured stock figures so a
//! build with no modifications projects exactly stock performance.

use crate::error::{Error, Result};
use crate::vehicle::{Drivetrain, Vehicle};

/// Empirical coefficients for the drag-strip correlations.
pub mod constants {
    /// Quarter-mile elapsed-time coefficient (Hale correlation family).
    pub const QUARTER_MILE_ET_COEFFICIENT: f64 = 5.825;

    /// Quarter-mile trap-speed coefficient, in mph.
    pub const TRAP_SPEED_COEFFICIENT: f64 = 230.0;

    /// Cube-root exponent shared by the elapsed-time and trap-speed fits.
    pub const WEIGHT_POWER_EXPONENT: f64 = 0.333;

    /// Pounds in one US ton, the power-to-weight denominator unit.
    pub const LBS_PER_US_TON: f64 = 2000.0;

    /// Horsepower scale in the 0-60 launch correlation.
    pub const ZERO_TO_SIXTY_POWER_SCALE: f64 = 10.0;
}

/// Calculate power-to-weight in horsepower per US ton.
///
/// # Arguments
///
/// * `hp` - Crank horsepower
/// * `weight_lbs` - Vehicle weight in pounds
///
/// # Errors
///
/// Returns [`Error::InvalidProjection`] if either figure is non-positive or
/// non-finite.
///
/// # Examples
///
/// ```
/// use dynosim_lib::projection::kinematics::power_to_weight;
///
/// let ratio = power_to_weight(291.0, 3483.0).unwrap();
/// assert!(ratio > 160.0 && ratio < 175.0);
/// ```
pub fn power_to_weight(hp: f64, weight_lbs: f64) -> Result<f64> {
    check_positive(hp, "horsepower")?;
    check_positive(weight_lbs, "weight")?;
    Ok(hp / (weight_lbs / constants::LBS_PER_US_TON))
}

/// Calculate a 0-60 mph estimate from the launch correlation.
///
/// The calculation follows the formula:
/// ```text
/// t = sqrt(weight / (hp * 10 * traction))
/// ```
///
/// # Arguments
///
/// * `hp` - Crank horsepower
/// * `weight_lbs` - Vehicle weight in pounds
/// * `traction` - Traction factor from [`traction_factor`]
///
/// # Errors
///
/// Returns [`Error::InvalidProjection`] if any argument is non-positive or
/// non-finite.
pub fn zero_to_sixty_correlation(hp: f64, weight_lbs: f64, traction: f64) -> Result<f64> {
    check_positive(hp, "horsepower")?;
    check_positive(weight_lbs, "weight")?;
    check_positive(traction, "traction factor")?;
    Ok((weight_lbs / (hp * constants::ZERO_TO_SIXTY_POWER_SCALE * traction)).sqrt())
}

/// Calculate a quarter-mile elapsed time estimate in seconds.
///
/// The calculation follows the formula:
/// ```text
/// et = 5.825 * (weight / hp)^0.333
/// ```
///
/// # Arguments
///
/// * `hp` - Crank horsepower
/// * `weight_lbs` - Vehicle weight in pounds
///
/// # Errors
///
/// Returns [`Error::InvalidProjection`] if either figure is non-positive or
/// non-finite.
///
/// # Examples
///
/// ```
/// use dynosim_lib::projection::kinematics::quarter_mile_et_correlation;
///
/// let et = quarter_mile_et_correlation(291.0, 3483.0).unwrap();
/// assert!(et > 13.0 && et < 13.6);
/// ```
pub fn quarter_mile_et_correlation(hp: f64, weight_lbs: f64) -> Result<f64> {
    check_positive(hp, "horsepower")?;
    check_positive(weight_lbs, "weight")?;
    Ok(constants::QUARTER_MILE_ET_COEFFICIENT
        * (weight_lbs / hp).powf(constants::WEIGHT_POWER_EXPONENT))
}

/// Calculate a quarter-mile trap speed estimate in mph.
///
/// The calculation follows the formula:
/// ```text
/// trap = 230 * (hp / weight)^0.333
/// ```
///
/// # Arguments
///
/// * `hp` - Crank horsepower
/// * `weight_lbs` - Vehicle weight in pounds
///
/// # Errors
///
/// Returns [`Error::InvalidProjection`] if either figure is non-positive or
/// non-finite.
pub fn trap_speed_correlation(hp: f64, weight_lbs: f64) -> Result<f64> {
    check_positive(hp, "horsepower")?;
    check_positive(weight_lbs, "weight")?;
    Ok(constants::TRAP_SPEED_COEFFICIENT
        * (hp / weight_lbs).powf(constants::WEIGHT_POWER_EXPONENT))
}

/// Traction factor for the launch correlation.
///
/// Starts from the drivetrain's baseline and sharpens with stickier tires.
/// Tire grip feeds in at half weight since a launch is traction-limited only
/// until the tires hook.
pub fn traction_factor(drivetrain: Drivetrain, tire_grip_pct: f64) -> f64 {
    drivetrain.traction_base() * (1.0 + tire_grip_pct / 200.0)
}

/// Inputs for a full kinematic derivation.
#[derive(Debug, Clone, Copy)]
pub struct KinematicParams<'a> {
    pub vehicle: &'a Vehicle,
    /// Projected crank horsepower, unrounded.
    pub final_hp: f64,
    /// Accumulated weight change over stock, in pounds.
    pub weight_delta_lbs: f64,
    /// Capped tire-category grip percentage.
    pub tire_grip_pct: f64,
    /// Capped combined grip percentage (suspension + aero + tire).
    pub total_grip_pct: f64,
    /// Capped brakes-category percentage.
    pub braking_pct: f64,
}

/// Derived acceleration, braking, and grip figures, unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBlock {
    pub power_to_weight: f64,
    pub zero_to_sixty: f64,
    pub quarter_mile_et: f64,
    pub quarter_mile_trap_mph: f64,
    pub braking_60_to_0_ft: f64,
    pub lateral_g: f64,
}

/// Derive the full kinematic block for a projected build.
///
/// Acceleration figures are stock-anchored: the correlation is evaluated for
/// both the stock and the projected configuration, and the measured stock
/// figure is scaled by their ratio. An unmodified build therefore reproduces
/// the stock figures exactly instead of whatever the raw correlation thinks
/// of the vehicle.
///
/// Braking distance scales linearly with weight and shrinks with the brakes
/// percentage; lateral grip grows with the combined grip percentage.
///
/// # Errors
///
/// Returns [`Error::InvalidProjection`] when projected horsepower is
/// non-positive or weight deltas push the vehicle to a non-positive weight.
pub fn derive_kinematics(params: KinematicParams<'_>) -> Result<KinematicBlock> {
    let vehicle = params.vehicle;

    if !params.final_hp.is_finite() || params.final_hp <= 0.0 {
        tracing::error!(
            "projected horsepower {} for '{}' is not physical",
            params.final_hp,
            vehicle.name
        );
        return Err(Error::InvalidProjection {
            message: format!(
                "projected horsepower must be positive, got {}",
                params.final_hp
            ),
        });
    }

    let weight = vehicle.curb_weight_lbs + params.weight_delta_lbs;
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::InvalidProjection {
            message: format!("projected weight must be positive, got {weight} lbs"),
        });
    }

    let stock_traction = traction_factor(vehicle.drivetrain, 0.0);
    let traction = traction_factor(vehicle.drivetrain, params.tire_grip_pct);

    let stock_sixty =
        zero_to_sixty_correlation(vehicle.stock_hp, vehicle.curb_weight_lbs, stock_traction)?;
    let sixty = zero_to_sixty_correlation(params.final_hp, weight, traction)?;

    let stock_et = quarter_mile_et_correlation(vehicle.stock_hp, vehicle.curb_weight_lbs)?;
    let et = quarter_mile_et_correlation(params.final_hp, weight)?;

    // No measured stock trap speed exists to anchor against, so the trap
    // figure comes straight from the correlation.
    let trap = trap_speed_correlation(params.final_hp, weight)?;

    Ok(KinematicBlock {
        power_to_weight: power_to_weight(params.final_hp, weight)?,
        zero_to_sixty: vehicle.stock_zero_to_sixty * (sixty / stock_sixty),
        quarter_mile_et: vehicle.stock_quarter_mile * (et / stock_et),
        quarter_mile_trap_mph: trap,
        braking_60_to_0_ft: vehicle.stock_braking_60_to_0_ft
            * (weight / vehicle.curb_weight_lbs)
            * (1.0 - params.braking_pct / 100.0),
        lateral_g: vehicle.stock_lateral_g * (1.0 + params.total_grip_pct / 100.0),
    })
}

fn check_positive(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidProjection {
            message: format!("{what} must be a finite positive number, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{na_vehicle, turbo_vehicle};

    fn stock_params(vehicle: &Vehicle) -> KinematicParams<'_> {
        KinematicParams {
            vehicle,
            final_hp: vehicle.stock_hp,
            weight_delta_lbs: 0.0,
            tire_grip_pct: 0.0,
            total_grip_pct: 0.0,
            braking_pct: 0.0,
        }
    }

    #[test]
    fn power_to_weight_uses_us_tons() {
        let ratio = power_to_weight(300.0, 3000.0).unwrap();
        assert_eq!(ratio, 200.0);
    }

    #[test]
    fn unmodified_build_reproduces_stock_figures_exactly() {
        let vehicle = turbo_vehicle();
        let block = derive_kinematics(stock_params(&vehicle)).unwrap();
        assert_eq!(block.zero_to_sixty, vehicle.stock_zero_to_sixty);
        assert_eq!(block.quarter_mile_et, vehicle.stock_quarter_mile);
        assert_eq!(block.braking_60_to_0_ft, vehicle.stock_braking_60_to_0_ft);
        assert_eq!(block.lateral_g, vehicle.stock_lateral_g);
    }

    #[test]
    fn more_power_accelerates_harder_and_traps_faster() {
        let vehicle = turbo_vehicle();
        let stock = derive_kinematics(stock_params(&vehicle)).unwrap();
        let mut params = stock_params(&vehicle);
        params.final_hp = vehicle.stock_hp + 150.0;
        let built = derive_kinematics(params).unwrap();

        assert!(built.zero_to_sixty < stock.zero_to_sixty);
        assert!(built.quarter_mile_et < stock.quarter_mile_et);
        assert!(built.quarter_mile_trap_mph > stock.quarter_mile_trap_mph);
        assert!(built.power_to_weight > stock.power_to_weight);
    }

    #[test]
    fn weight_reduction_improves_acceleration_and_braking() {
        let vehicle = na_vehicle();
        let stock = derive_kinematics(stock_params(&vehicle)).unwrap();
        let mut params = stock_params(&vehicle);
        params.weight_delta_lbs = -90.0;
        let lighter = derive_kinematics(params).unwrap();

        assert!(lighter.zero_to_sixty < stock.zero_to_sixty);
        assert!(lighter.quarter_mile_et < stock.quarter_mile_et);
        assert!(lighter.braking_60_to_0_ft < stock.braking_60_to_0_ft);
    }

    #[test]
    fn added_weight_slows_the_car_down() {
        let vehicle = na_vehicle();
        let stock = derive_kinematics(stock_params(&vehicle)).unwrap();
        let mut params = stock_params(&vehicle);
        params.weight_delta_lbs = 120.0;
        let heavier = derive_kinematics(params).unwrap();

        assert!(heavier.zero_to_sixty > stock.zero_to_sixty);
        assert!(heavier.braking_60_to_0_ft > stock.braking_60_to_0_ft);
    }

    #[test]
    fn sticky_tires_sharpen_the_launch_only() {
        let vehicle = turbo_vehicle();
        let stock = derive_kinematics(stock_params(&vehicle)).unwrap();
        let mut params = stock_params(&vehicle);
        params.tire_grip_pct = 10.0;
        let tires = derive_kinematics(params).unwrap();

        assert!(tires.zero_to_sixty < stock.zero_to_sixty);
        // Elapsed time and trap speed ignore launch traction.
        assert_eq!(tires.quarter_mile_et, stock.quarter_mile_et);
        assert_eq!(tires.quarter_mile_trap_mph, stock.quarter_mile_trap_mph);
    }

    #[test]
    fn brake_and_grip_percentages_apply_directly() {
        let vehicle = na_vehicle();
        let mut params = stock_params(&vehicle);
        params.braking_pct = 20.0;
        params.total_grip_pct = 10.0;
        let block = derive_kinematics(params).unwrap();

        assert!((block.braking_60_to_0_ft - vehicle.stock_braking_60_to_0_ft * 0.8).abs() < 1e-9);
        assert!((block.lateral_g - vehicle.stock_lateral_g * 1.1).abs() < 1e-9);
    }

    #[test]
    fn non_positive_horsepower_is_rejected() {
        let vehicle = turbo_vehicle();
        let mut params = stock_params(&vehicle);
        params.final_hp = 0.0;
        assert!(matches!(
            derive_kinematics(params),
            Err(Error::InvalidProjection { .. })
        ));

        params.final_hp = f64::NAN;
        assert!(derive_kinematics(params).is_err());
    }

    #[test]
    fn weight_delta_cannot_erase_the_vehicle() {
        let vehicle = na_vehicle();
        let mut params = stock_params(&vehicle);
        params.weight_delta_lbs = -vehicle.curb_weight_lbs;
        assert!(derive_kinematics(params).is_err());
    }

    #[test]
    fn raw_correlations_reject_non_positive_inputs() {
        assert!(power_to_weight(-1.0, 3000.0).is_err());
        assert!(zero_to_sixty_correlation(300.0, 0.0, 0.048).is_err());
        assert!(quarter_mile_et_correlation(300.0, f64::NAN).is_err());
        assert!(trap_speed_correlation(0.0, 3000.0).is_err());
    }

    #[test]
    fn traction_factor_orders_drivetrains() {
        assert!(
            traction_factor(Drivetrain::Awd, 0.0) > traction_factor(Drivetrain::Rwd, 0.0)
        );
        assert!(
            traction_factor(Drivetrain::Rwd, 10.0) > traction_factor(Drivetrain::Rwd, 0.0)
        );
    }
}

// Test-only fixtures for `dynosim-lib` tests
#![allow(dead_code)]

use crate::vehicle::{Drivetrain, EngineArchitecture, Vehicle};

/// Turbocharged AWD sedan fixture: 291 hp on 21 psi of factory boost.
pub fn turbo_vehicle() -> Vehicle {
    Vehicle {
        name: "test turbo sedan".to_string(),
        stock_hp: 291.0,
        stock_torque: 290.0,
        curb_weight_lbs: 3483.0,
        engine_architecture: EngineArchitecture::Turbocharged,
        stock_boost_psi: Some(21.0),
        stock_zero_to_sixty: 4.9,
        stock_quarter_mile: 13.5,
        stock_braking_60_to_0_ft: 109.0,
        stock_lateral_g: 0.96,
        drivetrain: Drivetrain::Awd,
    }
}

/// Naturally aspirated RWD coupe fixture: 182 hp, no boost.
pub fn na_vehicle() -> Vehicle {
    Vehicle {
        name: "test na coupe".to_string(),
        stock_hp: 182.0,
        stock_torque: 176.0,
        curb_weight_lbs: 2800.0,
        engine_architecture: EngineArchitecture::NaturallyAspirated,
        stock_boost_psi: None,
        stock_zero_to_sixty: 6.7,
        stock_quarter_mile: 15.2,
        stock_braking_60_to_0_ft: 119.0,
        stock_lateral_g: 0.90,
        drivetrain: Drivetrain::Rwd,
    }
}

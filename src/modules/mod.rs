pub mod championship;
pub mod config;
pub mod result_file;
pub mod models {
    pub mod comparison;
    pub mod driver;
    pub mod event;
}

pub mod helpers {
    pub mod lap;
    pub mod logging;

    pub mod math;
    pub mod general;

    pub mod handelbars {
        pub mod abbreviate_name;
        pub mod format_pace;
        pub mod to_json;
    }
}

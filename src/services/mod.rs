pub mod capacity_calculation;
pub mod planning_types;
pub mod release_planning;
pub mod release_yaml;

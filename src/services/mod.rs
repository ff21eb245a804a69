pub mod catalog_service;
pub mod chat_service;
pub mod day_packer_service;
pub mod travel_service;
pub mod trip_planner_service;

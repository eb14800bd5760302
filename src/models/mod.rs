pub mod allocation;
pub mod daily_target;
pub mod date_range;
pub mod day_record;
pub mod day_status;
pub mod reference;

pub mod calendar;
pub mod release;
pub mod ticket;

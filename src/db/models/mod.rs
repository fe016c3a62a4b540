mod calendar;
mod appointment_type;
mod availability_override;
mod appointment;

pub use calendar::*;
pub use appointment_type::*;
pub use availability_override::*;
pub use appointment::*;

pub mod reservation;
pub mod reservation_id;
pub mod reservation_store;

pub use reservation::{Reservation, ReservationStatus};
pub use reservation_id::{FIRST_RESERVATION_ID, ReservationId, ReservationIdSequence};
pub use reservation_store::ReservationStore;

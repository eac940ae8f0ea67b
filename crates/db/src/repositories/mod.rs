pub mod field_repo;
pub mod reservation_repo;
pub mod user_repo;

pub use field_repo::FieldRepo;
pub use reservation_repo::ReservationRepo;
pub use user_repo::UserRepo;

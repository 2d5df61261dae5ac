pub mod entities;
pub mod movement_type;
pub mod password;
pub mod repositories;

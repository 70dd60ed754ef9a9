pub mod investment;
pub mod mortgage;
pub mod snowball;
pub mod tax;

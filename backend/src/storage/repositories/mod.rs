pub mod deposit_repository;

pub use deposit_repository::DepositRepository;

pub mod deposit_mapper;

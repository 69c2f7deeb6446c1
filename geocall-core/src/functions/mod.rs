pub mod constructors;

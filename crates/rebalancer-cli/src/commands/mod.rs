pub mod allocate;

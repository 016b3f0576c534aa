mod client_tests;
mod utils;

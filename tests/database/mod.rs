pub mod test_helpers;

mod db_tests;

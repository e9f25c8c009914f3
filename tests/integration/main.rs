mod common;

mod fixture_test;
mod health_test;

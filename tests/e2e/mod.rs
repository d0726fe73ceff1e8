mod scenarios;
mod fixture_tests;

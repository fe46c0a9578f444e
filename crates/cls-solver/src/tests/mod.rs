mod repository_tests;
mod subtype_tests;

mod error_classification_tests;

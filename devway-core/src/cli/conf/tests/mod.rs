mod dump_tests;

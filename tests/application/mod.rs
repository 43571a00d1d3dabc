mod narration_service_test;

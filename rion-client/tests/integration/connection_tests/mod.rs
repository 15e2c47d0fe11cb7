mod test_negotiation_failures;
mod test_publisher_connects;

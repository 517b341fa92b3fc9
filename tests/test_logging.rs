
use flight_network::Route;
use log::Level;
use network_fixture::leg;

// logtest installs a process-wide logger, so this binary holds a single test.
#[test]
fn test_dropped_release_is_logged_as_warning() {
    let mut logger = logtest::Logger::start();

    let ath_skg = leg("ATH", "SKG", 10, 80.0, "A3301");
    let route = Route::new(vec![ath_skg.clone()]).unwrap();

    assert!(route.book_route(2));
    route.cancel_route(5);
    assert_eq!(ath_skg.read().unwrap().available_seats(), 8);

    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == Level::Warn {
            warnings.push(record.args().to_string());
        }
    }

    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].contains("Dropped release of 5 seats on A3301"));
}

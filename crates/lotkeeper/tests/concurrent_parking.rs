use std::sync::{Arc, Barrier};
use std::thread;

use lotkeeper::parking::{
    InMemoryParkingStore, ParkingLotCommandUseCase, ParkingLotName, ParkingLotQueryUseCase,
    ParkingLotService, ParkingSpaceCount,
};
use lotkeeper::LicensePlateNumber;

fn lot(raw: &str) -> ParkingLotName {
    ParkingLotName::new(raw).expect("valid lot name")
}

#[test]
fn parallel_arrivals_fill_each_lot_exactly() {
    const LOTS: [&str; 3] = ["A", "B", "C"];
    const CAPACITY: i64 = 4;
    const ARRIVALS_PER_LOT: usize = 16;

    let service = Arc::new(ParkingLotService::from_store(Arc::new(
        InMemoryParkingStore::default(),
    )));
    for name in LOTS {
        service
            .create_parking_lot(lot(name), ParkingSpaceCount::new(CAPACITY).expect("count"))
            .expect("create");
    }

    let barrier = Arc::new(Barrier::new(LOTS.len() * ARRIVALS_PER_LOT));
    let handles: Vec<_> = LOTS
        .iter()
        .enumerate()
        .flat_map(|(lot_index, name)| {
            (0..ARRIVALS_PER_LOT).map(move |arrival| (lot_index, *name, arrival))
        })
        .map(|(lot_index, name, arrival)| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let plate = LicensePlateNumber::parse(format!("{}가{:04}", lot_index + 1, arrival))
                    .expect("valid plate");
                barrier.wait();
                service.park_car(&lot(name), &plate).is_ok()
            })
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker panicked"))
        .filter(|admitted| *admitted)
        .count();
    assert_eq!(admitted, LOTS.len() * CAPACITY as usize);

    for name in LOTS {
        let status = service.get_parking_lot_status(&lot(name)).expect("status");
        assert!(status.is_full(), "lot {name} should be full");
        assert_eq!(status.occupied_spaces().value(), CAPACITY as u64);
    }
}

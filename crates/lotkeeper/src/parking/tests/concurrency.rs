use std::sync::Barrier;
use std::thread;

use super::common::{build_service, lot_name, numbered_plate, plate, spaces};
use crate::domain::DomainError;
use crate::parking::ports::{ParkingError, ParkingLotCommandUseCase, ParkingLotQueryUseCase};

#[test]
fn concurrent_parks_never_exceed_capacity() {
    const CAPACITY: i64 = 5;
    const CONTENDERS: usize = 32;

    let (service, _store) = build_service();
    service
        .create_parking_lot(lot_name("A"), spaces(CAPACITY))
        .expect("create");
    let barrier = Barrier::new(CONTENDERS);

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|index| {
                let service = &service;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service.park_car(&lot_name("A"), &numbered_plate(index))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    let parked = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(parked, CAPACITY as usize);
    for outcome in outcomes.iter().filter(|outcome| outcome.is_err()) {
        assert!(
            matches!(outcome, Err(ParkingError::Domain(DomainError::LotFull { .. }))),
            "unexpected outcome {outcome:?}"
        );
    }

    let status = service
        .get_parking_lot_status(&lot_name("A"))
        .expect("status");
    assert!(status.is_full());
    assert_eq!(status.occupied_spaces(), spaces(CAPACITY));
}

#[test]
fn one_plate_racing_into_two_lots_parks_once() {
    const ROUNDS: usize = 20;

    let (service, _store) = build_service();
    service
        .create_parking_lot(lot_name("A"), spaces(10))
        .expect("create");
    service
        .create_parking_lot(lot_name("B"), spaces(10))
        .expect("create");

    for _ in 0..ROUNDS {
        let barrier = Barrier::new(2);
        let outcomes: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = ["A", "B"]
                .into_iter()
                .map(|name| {
                    let service = &service;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        service.park_car(&lot_name(name), &plate("12가3456"))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker panicked"))
                .collect()
        });

        assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|outcome| matches!(
            outcome,
            Err(ParkingError::Domain(DomainError::AlreadyParked { .. }))
        )));
        service.leave_car(&plate("12가3456")).expect("leave");
    }
}

#[test]
fn concurrent_leaves_close_a_record_once() {
    const CONTENDERS: usize = 8;

    let (service, store) = build_service();
    service
        .create_parking_lot(lot_name("A"), spaces(1))
        .expect("create");
    service
        .park_car(&lot_name("A"), &plate("12가3456"))
        .expect("park");
    let barrier = Barrier::new(CONTENDERS);

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|_| {
                let service = &service;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service.leave_car(&plate("12가3456"))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().filter(|outcome| outcome.is_err()).all(|outcome| matches!(
        outcome,
        Err(ParkingError::Domain(DomainError::NotParked { .. }))
    )));
    assert_eq!(store.history(&plate("12가3456")).expect("history").len(), 1);
}

#[test]
fn lock_registry_drains_after_contention() {
    const CONTENDERS: usize = 16;

    let (service, _store) = build_service();
    service
        .create_parking_lot(lot_name("A"), spaces(4))
        .expect("create");
    let barrier = Barrier::new(CONTENDERS);

    thread::scope(|scope| {
        for index in 0..CONTENDERS {
            let service = &service;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                let name = if index % 2 == 0 { "A" } else { "missing" };
                let _ = service.park_car(&lot_name(name), &numbered_plate(index));
            });
        }
    });

    assert_eq!(service.tracked_lock_count(), 0);
}

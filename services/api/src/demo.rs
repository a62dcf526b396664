use crate::infra::Services;
use chrono::Utc;
use clap::Args;
use lotkeeper::error::AppError;
use lotkeeper::parking::{
    ParkingError, ParkingLotCommandUseCase, ParkingLotName, ParkingLotQueryUseCase,
    ParkingLotStatus, ParkingSpaceCount,
};
use lotkeeper::LicensePlateNumber;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Name of the demo lot
    #[arg(long, default_value = "Demo")]
    pub(crate) lot: String,
    /// Capacity of the demo lot
    #[arg(long, default_value_t = 3)]
    pub(crate) spaces: i64,
    /// Number of arriving vehicles (defaults to one more than capacity)
    #[arg(long)]
    pub(crate) arrivals: Option<usize>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let services = Services::in_memory();
    let transcript = demo_transcript(&services, args)?;
    for line in transcript {
        println!("{line}");
    }
    Ok(())
}

fn demo_transcript(services: &Services, args: DemoArgs) -> Result<Vec<String>, AppError> {
    let DemoArgs {
        lot,
        spaces,
        arrivals,
    } = args;
    let name = ParkingLotName::new(lot)?;
    let total_spaces = ParkingSpaceCount::new(spaces)?;
    let arrivals = arrivals.unwrap_or(total_spaces.value() as usize + 1);
    let parking = services.parking.as_ref();

    let mut lines = vec![format!("Parking lot demo ({})", Utc::now().format("%Y-%m-%d %H:%M"))];
    parking.create_parking_lot(name.clone(), total_spaces)?;
    lines.push(format!("Created '{name}' with {total_spaces} spaces"));

    let plates = (0..arrivals)
        .map(|index| LicensePlateNumber::parse(format!("{}가{:04}", 10 + index % 90, index)))
        .collect::<Result<Vec<_>, _>>()?;

    for plate in &plates {
        match parking.park_car(&name, plate) {
            Ok(_) => lines.push(format!("  parked {plate}")),
            Err(ParkingError::Domain(error)) => lines.push(format!("  turned away {plate}: {error}")),
            Err(error) => return Err(error.into()),
        }
    }
    lines.push(status_line(&parking.get_parking_lot_status(&name)?));

    if let Some(first) = plates.first() {
        let record = parking.leave_car(first)?;
        let minutes = record.parking_duration(Utc::now()).num_minutes();
        lines.push(format!("  {first} left after {minutes} min"));
        lines.push(status_line(&parking.get_parking_lot_status(&name)?));
    }

    Ok(lines)
}

fn status_line(status: &ParkingLotStatus) -> String {
    format!(
        "Status: {}/{} occupied ({}%), {} available{}",
        status.occupied_spaces(),
        status.total_spaces(),
        status.occupancy_percentage(),
        status.available_spaces(),
        if status.is_full() { ", FULL" } else { "" }
    )
}

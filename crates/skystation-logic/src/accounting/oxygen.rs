//! Oxygen regulation: release tank O2 into thin air, once mid-cycle and
//! again after the finalize housekeeping.

use crate::air::Gas;
use crate::report::{EntryTag, ReportDraft};
use crate::resources::TankType;
use crate::station::Station;

/// Top up breathing air from O2 tanks when quality has dropped to Medium
/// or worse.
///
/// Whatever leaves the tanks lands in the air, so O2 across tanks and air
/// is unchanged. Returns the amount moved.
pub fn regulate_oxygen(station: &mut Station, report: &mut ReportDraft) -> u32 {
    let quality = station.air.air_quality();
    if !quality.needs_regulation() {
        return 0;
    }
    let deficit = station.air.needs_oxygen();
    if deficit == 0 {
        report.note(
            EntryTag::Air,
            format!("Air quality is {:?} but oxygen is sufficient", quality),
        );
        return 0;
    }

    let drawn = station.truss.charge_from(TankType::O2, deficit);
    station.air.add(Gas::O2, drawn);
    if drawn < deficit {
        report.problem(
            EntryTag::Air,
            format!(
                "Oxygen tanks short by {} while regulating {:?} air",
                deficit - drawn,
                quality
            ),
        );
    } else {
        report.note(EntryTag::Air, format!("Released {} O2 into the air", drawn));
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::AirQuality;
    use crate::resources::Tank;
    use chrono::{TimeZone, Utc};

    fn station() -> Station {
        Station::new(Utc.with_ymd_and_hms(2040, 3, 6, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_regulation_conserves_oxygen() {
        let mut s = station();
        s.air.o2 = 221;
        s.air.n2 = 1280;
        s.truss.tanks.push(Tank::new(TankType::O2, 500, 1000).unwrap());
        let mut report = ReportDraft::begin(&s, s.accounting_date);

        let before = s.air.o2 + s.truss.tank_total(TankType::O2);
        assert_eq!(regulate_oxygen(&mut s, &mut report), 120);
        assert_eq!(s.air.o2 + s.truss.tank_total(TankType::O2), before);
        assert_eq!(s.air.o2, 341);
        assert_eq!(s.air.air_quality(), AirQuality::Great);
    }

    #[test]
    fn test_empty_tanks_report_a_problem() {
        let mut s = station();
        s.air.o2 = 100;
        s.air.n2 = 900;
        s.truss.tanks.push(Tank::new(TankType::O2, 5, 1000).unwrap());
        let mut report = ReportDraft::begin(&s, s.accounting_date);

        assert_eq!(regulate_oxygen(&mut s, &mut report), 5);
        assert_eq!(s.air.o2, 105);
        assert_eq!(report.problems_tagged(EntryTag::Air).count(), 1);
    }

    #[test]
    fn test_good_air_is_left_alone() {
        let mut s = station();
        s.air = crate::air::AirComposition::fresh(1000);
        s.truss.tanks.push(Tank::new(TankType::O2, 500, 1000).unwrap());
        let mut report = ReportDraft::begin(&s, s.accounting_date);

        assert_eq!(regulate_oxygen(&mut s, &mut report), 0);
        assert_eq!(s.truss.tank_total(TankType::O2), 500);
    }
}

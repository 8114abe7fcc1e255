use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

const WEEKDAYS: [&str; 7] = [
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
    "domingo",
];

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format a point in time as a long brazilian portuguese date, e.g.
/// `segunda-feira, 19 de outubro de 2026 às 11:30`.
pub fn format_received_at(time: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = time.with_timezone(&offset);
    format!(
        "{}, {} de {} de {} às {:02}:{:02}",
        WEEKDAYS[local.weekday().num_days_from_monday() as usize],
        local.day(),
        MONTHS[local.month0() as usize],
        local.year(),
        local.hour(),
        local.minute(),
    )
}

use std::time::Duration;

use jiff::SpanRelativeTo;

fn parse_signed_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    // Bare numbers are milliseconds, the unit of the request stagger
    if let Ok(millis) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_millis(millis.abs()));
    }

    Err(String::from("Invalid duration"))
}

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let duration = parse_signed_duration(input)?;

    Duration::try_from(duration).map_err(|_| String::from("Duration must be positive"))
}

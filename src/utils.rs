use chrono::{DateTime, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};

const ID_LEN: usize = 8;

/// Random alphanumeric id, regenerated until `taken` rejects nothing.
pub fn generate_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LEN)
            .map(char::from)
            .collect();
        if !taken(&id) {
            return id;
        }
    }
}

pub fn relative_time(posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - posted).num_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} hour ago", hours)
    } else {
        format!("{} day ago", days)
    }
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        17..=19 => "Good Evening",
        _ => "Good Night",
    }
}

pub fn today_label(date: NaiveDate) -> String {
    date.format("%a, %b %d %Y").to_string()
}

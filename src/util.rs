use chrono::{DateTime, Utc};
use time_humanize::{Accuracy, HumanTime, Tense};

pub fn format_best_score(best: Option<u32>) -> String {
    match best {
        Some(score) => score.to_string(),
        None => "-".to_string(),
    }
}

/// "3 hours ago" style description of the last win, relative to `now`
pub fn last_played_text(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match last {
        Some(then) => {
            // clock skew can put `then` in the future; treat that as just now
            let elapsed = (now - then).to_std().unwrap_or_default();
            HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
        }
        None => "never".to_string(),
    }
}

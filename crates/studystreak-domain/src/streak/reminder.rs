/// Encouragement text for a user who has not practised today.
pub fn compose_reminder_message(current_streak: u32, freeze_tokens: u32) -> String {
    let tokens = match freeze_tokens {
        1 => "1 freeze token left".to_string(),
        n => format!("{} freeze tokens left", n),
    };

    if current_streak >= 30 {
        format!(
            "Your {}-day streak is impressive! Don't let it break today. ({})",
            current_streak, tokens
        )
    } else if current_streak >= 7 {
        format!(
            "You're on a {}-day streak! Keep the momentum going. ({})",
            current_streak, tokens
        )
    } else if current_streak >= 3 {
        format!(
            "Your {}-day streak is taking shape! Keep building it today. ({})",
            current_streak, tokens
        )
    } else {
        format!(
            "You're on a {}-day streak! A great start, keep it up. ({})",
            current_streak, tokens
        )
    }
}

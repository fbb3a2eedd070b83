//! Prompt templates for the chat endpoint
//!
//! The user message is interpolated verbatim, without escaping. A user can
//! therefore phrase their message as instructions to the model; this is an
//! accepted limitation and the only guard is the input length limit.

use chrono::Local;

/// Current local wall-clock time, formatted like `1/31/2025, 3:04:05 PM`
pub fn current_time() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Prompt for the conversational reply
pub fn reply_prompt(user_message: &str, now: &str) -> String {
    format!(
        "You are a helpful AI embedded in a chat app.\n\
         THE TIME NOW IS {now}\n\
         User's message: \"{user_message}\"\n\
         Respond in a friendly, clear, and concise manner.\n\
         Avoid fluff, directly respond to the user's request or inquiry with precision and clarity.\n\
         Keep the answer to 6-7 sentences."
    )
}

/// Prompt for the summary of the user's message
pub fn summary_prompt(user_message: &str) -> String {
    format!(
        "Summarize the following message in 4-5 sentences, keeping it clear and concise.\n\
         User's message: \"{user_message}\""
    )
}

/// Prompt for a formal email reply
pub fn email_prompt(user_message: &str, now: &str) -> String {
    format!(
        "You are an AI email assistant embedded in an email client app.\n\
         THE TIME NOW IS {now}\n\
         User's request: \"{user_message}\"\n\
         Compose a formal and professional email reply, keeping it clear, polite, and actionable.\n\
         Do not add fluff like \"Here is your email\" or \"Here is your response\".\n\
         Keep the tone professional and helpful, in 6-7 sentences."
    )
}

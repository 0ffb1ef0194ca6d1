//! Activation URI decoding.
//!
//! The website starts the launcher with a single argument of the form
//!
//! ```text
//! bubba-player://launchmode:play+gameinfo:<ticket>+placelauncherurl:<url>+clientyear:2021
//! ```
//!
//! Tokens are separated by `+` and split on their first `:` only, so values
//! such as URLs keep their own colons. Unknown keys and tokens without a `:`
//! are ignored, and missing keys default to empty strings.

/// Parameters decoded from an activation URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub launch_mode: String,
    pub auth_ticket: String,
    pub join_script: String,
    pub client_year: String,
}

impl LaunchRequest {
    pub fn is_play(&self) -> bool {
        self.launch_mode == "play"
    }
}

/// Decodes the activation argument.
///
/// Returns `None` for an absent or empty argument, which means "no game
/// requested". Any non-empty argument yields a request, even if none of its
/// keys are recognized.
pub fn parse_activation(arg: Option<&str>, scheme: &str) -> Option<LaunchRequest> {
    let arg = arg.filter(|a| !a.is_empty())?;

    let prefix = format!("{scheme}://");
    let payload = arg.strip_prefix(&prefix).unwrap_or(arg);

    let mut request = LaunchRequest::default();
    for token in payload.split('+') {
        let Some((key, value)) = token.split_once(':') else {
            continue;
        };
        let slot = match key {
            "launchmode" => &mut request.launch_mode,
            "gameinfo" => &mut request.auth_ticket,
            "placelauncherurl" => &mut request.join_script,
            "clientyear" => &mut request.client_year,
            _ => continue,
        };
        *slot = value.to_string();
    }
    Some(request)
}

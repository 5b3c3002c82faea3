use anyhow::{Context, Result};

use crate::facility::demo_link;

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// Open the Digital Twin demo for a facility and return the URL that was opened.
pub fn open_demo(base_url: &str, facility_name: &str) -> Result<String> {
    let url = demo_link(base_url, facility_name);
    open_url(&url)?;
    Ok(url)
}

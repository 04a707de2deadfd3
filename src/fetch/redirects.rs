//! Redirect following.

use log::debug;

use crate::client::HttpClient;
use crate::error_handling::FetchError;
use crate::fetch::url::{parse_url, resolve_location};
use crate::fetch::FetchedPage;

impl HttpClient {
    /// Fetches `url`, following up to `max_redirects` request cycles.
    ///
    /// # Errors
    ///
    /// Fails if a cycle fails, if a redirect carries no usable `location`,
    /// if the final status is not 200, or if every cycle ended in a
    /// redirect.
    pub fn try_fetch(&mut self, url: &str, max_redirects: usize) -> Result<FetchedPage, FetchError> {
        let mut current = url.to_string();

        for cycle in 1..=max_redirects {
            let target =
                parse_url(&current).ok_or_else(|| FetchError::InvalidUrl(current.clone()))?;
            debug!("[http] GET {current} ({cycle}/{max_redirects})");
            let response = self.perform_request(&target)?;

            if response.is_redirect() {
                let location = response
                    .location()
                    .ok_or(FetchError::MissingLocation(response.status_code))?;
                let next = resolve_location(&current, location)
                    .ok_or_else(|| FetchError::InvalidUrl(location.to_string()))?;
                debug!("[http] {} -> {next}", response.status_code);
                current = next;
                continue;
            }

            if response.status_code != 200 {
                return Err(FetchError::UnexpectedStatus(response.status_code));
            }
            return Ok(FetchedPage {
                body: response.body,
                final_url: current,
            });
        }

        Err(FetchError::TooManyRedirects(max_redirects))
    }
}

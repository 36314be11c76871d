//! Download the public OurAirports data files into a data directory.

use std::path::Path;

use futures::future::try_join_all;
use tracing::info;

use super::error::NavError;

/// `(file name, URL)` pairs fetched by [`fetch_ourairports`].
pub const OURAIRPORTS_FILES: [(&str, &str); 2] = [
    (
        "airports.csv",
        "https://davidmegginson.github.io/ourairports-data/airports.csv",
    ),
    (
        "navaids.csv",
        "https://davidmegginson.github.io/ourairports-data/navaids.csv",
    ),
];

/// Fetch every file in [`OURAIRPORTS_FILES`] concurrently and write it to
/// `dir`. Each body is checked to be well-formed CSV before anything is
/// written. Returns the total number of data rows.
pub async fn fetch_ourairports(dir: &Path, http: &reqwest::Client) -> Result<usize, NavError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| NavError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let bodies = try_join_all(OURAIRPORTS_FILES.iter().map(|(name, url)| async move {
        let response = http.get(*url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NavError::Api {
                status: status.as_u16(),
                message: format!("fetching {url}"),
            });
        }
        let body = response.bytes().await?;
        Ok::<_, NavError>((*name, body))
    }))
    .await?;

    let mut total = 0;
    for (name, body) in bodies {
        let path = dir.join(name);
        let rows = count_rows(&body).map_err(|source| NavError::Csv {
            path: path.clone(),
            source,
        })?;

        tokio::fs::write(&path, &body)
            .await
            .map_err(|source| NavError::Io {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), rows, "wrote navigation data file");
        total += rows;
    }

    Ok(total)
}

/// Number of well-formed data rows, excluding the header.
fn count_rows(body: &[u8]) -> Result<usize, csv::Error> {
    let mut reader = csv::Reader::from_reader(body);
    let mut rows = 0;
    for record in reader.records() {
        record?;
        rows += 1;
    }
    Ok(rows)
}

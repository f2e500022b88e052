//! List and delete command handlers

use crate::domain::recording::Recording;

use super::app::{CommandError, Library};
use super::presenter::Presenter;

/// Rows to print as `(index, recording)`.
///
/// Indexes always refer to the full newest-first list so they can be
/// passed to `play` and `delete` even when filtered.
fn numbered(all: &[Recording], shown: &[Recording]) -> Vec<(usize, Recording)> {
    shown
        .iter()
        .filter_map(|r| {
            all.iter()
                .position(|candidate| candidate.id == r.id)
                .map(|i| (i + 1, r.clone()))
        })
        .collect()
}

/// Print recordings, optionally filtered by `search`
pub async fn handle_list_command(
    library: &Library,
    search: Option<String>,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    let all = library.recordings.load_all().await;
    if all.is_empty() {
        presenter.info("No recordings yet");
        return Ok(());
    }

    let shown = match search.as_deref() {
        Some(query) => library.recordings.search(query),
        None => all.clone(),
    };
    if shown.is_empty() {
        presenter.info("No results");
        return Ok(());
    }

    for (index, recording) in numbered(&all, &shown) {
        presenter.recording_row(index, &recording);
    }
    Ok(())
}

/// Delete the recording picked by `target` and its audio file
pub async fn handle_delete_command(
    library: &Library,
    target: &str,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    let recording = library.resolve(target).await?;

    if !library.recordings.delete(&recording.id).await? {
        return Err(CommandError::NotFound(target.to_string()));
    }
    presenter.success(&format!("Deleted \"{}\"", recording.filename));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(id: &str) -> Recording {
        Recording {
            id: id.to_string(),
            uri: format!("/tmp/{id}.flac"),
            filename: format!("note {id}"),
            duration: 1,
            date: id.parse().unwrap(),
            size: None,
        }
    }

    #[test]
    fn numbering_follows_full_list() {
        let all = vec![recording("3"), recording("2"), recording("1")];
        let shown = vec![recording("1")];

        let rows = numbered(&all, &shown);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 3);
        assert_eq!(rows[0].1.id, "1");
    }

    #[test]
    fn numbering_unfiltered_is_sequential() {
        let all = vec![recording("3"), recording("2")];
        let indexes: Vec<usize> = numbered(&all, &all).into_iter().map(|(i, _)| i).collect();
        assert_eq!(indexes, vec![1, 2]);
    }
}

use crate::api::api_structs::Submission;
use itertools::Itertools;

/// A writer who entered more than one distinct project into the same
/// competition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSubmissionGroup {
    pub writer_id: String,
    pub competition_id: String,
    pub project_ids: Vec<String>,
    pub submission_ids: Vec<String>
}

impl DuplicateSubmissionGroup {
    /// Stable description used as flag details. Identical groups produce
    /// identical strings, which is what open-flag deduplication matches on.
    pub fn details(&self) -> String {
        format!(
            "{} submissions to competition {} (projects: {})",
            self.submission_ids.len(),
            self.competition_id,
            self.project_ids.join(", ")
        )
    }
}

/// Groups submissions by (writer, competition) and keeps the groups spanning
/// more than one distinct project. Resubmitting the same project is not a
/// signal. Output order is deterministic regardless of the order submissions
/// arrive in.
pub fn detect_duplicate_submissions(submissions: &[Submission]) -> Vec<DuplicateSubmissionGroup> {
    let mut groups: Vec<DuplicateSubmissionGroup> = submissions
        .iter()
        .map(|submission| {
            (
                (submission.writer_id.as_str(), submission.competition_id.as_str()),
                (submission.id.as_str(), submission.project_id.as_str())
            )
        })
        .into_group_map()
        .into_iter()
        .filter_map(|((writer_id, competition_id), entries)| {
            let project_ids = entries
                .iter()
                .map(|(_, project)| project.to_string())
                .sorted()
                .dedup()
                .collect_vec();
            if project_ids.len() < 2 {
                return None;
            }

            let submission_ids = entries.iter().map(|(id, _)| id.to_string()).sorted().collect_vec();
            Some(DuplicateSubmissionGroup {
                writer_id: writer_id.to_string(),
                competition_id: competition_id.to_string(),
                project_ids,
                submission_ids
            })
        })
        .collect();

    groups.sort_by(|a, b| (&a.writer_id, &a.competition_id).cmp(&(&b.writer_id, &b.competition_id)));
    groups
}

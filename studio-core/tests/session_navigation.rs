//! Integration tests for the session store, view projector, navigation
//! controller and the `Studio` callbacks that combine them.

use studio_core::nav::{Navigator, Preview};
use studio_core::types::{Commit, LabelOption, Metadata, Sample};
use studio_core::view::{project, Filter, Progress};
use studio_core::{Session, Studio};

fn sample(hash: &str, labels: &[&str]) -> Sample {
    Sample {
        commit: Commit {
            hash: hash.to_owned(),
            message: format!("commit {hash}"),
            ..Commit::default()
        },
        repository: "acme/repo".to_owned(),
        labels: labels.iter().map(|l| (*l).to_owned()).collect(),
        ..Sample::default()
    }
}

fn unlabeled(n: usize) -> Vec<Sample> {
    (0..n).map(|i| sample(&format!("h{i}"), &[])).collect()
}

fn options() -> Vec<LabelOption> {
    vec![LabelOption::new("feat", "Feature"), LabelOption::new("fix", "Bug fix")]
}

fn studio_at(samples: Vec<Sample>, index: Option<usize>) -> Studio {
    let metadata = Metadata { index, ..Metadata::default() };
    Studio::with_session(Session::load(samples, metadata), options())
}

fn hashes(studio: &Studio) -> Vec<String> {
    studio.session().samples().iter().map(|s| s.commit.hash.clone()).collect()
}

#[test]
fn project_all_is_identity_in_order() {
    let samples = vec![sample("a", &["fix"]), sample("b", &[]), sample("c", &[])];
    let view = project(&samples, Filter::All);
    let indices: Vec<usize> = view.iter().map(|v| v.original_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(view[1].sample.commit.hash, "b");
}

#[test]
fn only_unfinished_keeps_original_indices() {
    let samples = vec![sample("a", &[]), sample("b", &["fix"]), sample("c", &[])];
    let view = project(&samples, Filter::OnlyUnfinished);
    let indices: Vec<usize> = view.iter().map(|v| v.original_index).collect();
    assert_eq!(indices, vec![0, 2]);

    let finished = project(&samples, Filter::OnlyFinished);
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].original_index, 1);
}

#[test]
fn filter_toggles_are_mutually_exclusive() {
    assert_eq!(Filter::All.toggle_unfinished(), Filter::OnlyUnfinished);
    assert_eq!(Filter::OnlyUnfinished.toggle_unfinished(), Filter::All);
    assert_eq!(Filter::OnlyUnfinished.toggle_finished(), Filter::OnlyFinished);
    assert_eq!(Filter::OnlyFinished.toggle_finished(), Filter::All);
}

#[test]
fn load_resumes_index_from_metadata() {
    let resumed = Session::load(unlabeled(3), Metadata { index: Some(2), ..Metadata::default() });
    assert_eq!(resumed.current_index(), Some(2));

    let stale = Session::load(unlabeled(3), Metadata { index: Some(7), ..Metadata::default() });
    assert_eq!(stale.current_index(), Some(0), "out-of-bounds index falls back to 0");

    let fresh = Session::load(unlabeled(2), Metadata::default());
    assert_eq!(fresh.current_index(), Some(0));

    let empty = Session::load(Vec::new(), Metadata { index: Some(1), ..Metadata::default() });
    assert_eq!(empty.current_index(), None);
}

#[test]
fn mutations_return_new_values() {
    let original = Session::load(unlabeled(2), Metadata::default());

    let labeled = original.with_label(1, Some("feat"));
    assert!(original.samples()[1].labels.is_empty(), "receiver is untouched");
    assert_eq!(labeled.samples()[1].labels, vec!["feat".to_owned()]);
    assert_ne!(labeled, original);

    let moved = original.with_current_index(Some(1));
    assert!(moved.shares_samples_with(&original), "cursor moves share the sample list");

    let shorter = original.delete_at(0);
    assert_eq!(shorter.len(), 1);
    assert_eq!(original.len(), 2);
}

#[test]
fn label_is_idempotent_and_single_valued() {
    let session = Session::load(unlabeled(2), Metadata::default());
    let once = session.with_label(0, Some("fix"));
    let twice = once.with_label(0, Some("fix"));
    assert_eq!(twice.samples()[0].labels, vec!["fix".to_owned()]);
    assert_eq!(once, twice);

    let replaced = twice.with_label(0, Some("feat"));
    assert_eq!(replaced.samples()[0].labels, vec!["feat".to_owned()]);

    let cleared = replaced.with_label(0, None);
    assert!(cleared.samples()[0].labels.is_empty());
}

#[test]
fn out_of_range_mutations_are_no_ops() {
    let session = Session::load(unlabeled(2), Metadata::default());
    assert_eq!(session.with_label(5, Some("fix")), session);
    assert_eq!(session.delete_at(2), session);
    assert_eq!(Session::default().delete_at(0), Session::default());
}

#[test]
fn snapshot_metadata_keeps_file_name() {
    let metadata = Metadata { filename: Some("data.jsonl".to_owned()), ..Metadata::default() };
    let session = Session::load(unlabeled(3), metadata);
    let snap = session.snapshot_metadata_at(Some(2), 1_234);
    assert_eq!(snap.timestamp, Some(1_234));
    assert_eq!(snap.index, Some(2));
    assert_eq!(snap.filename.as_deref(), Some("data.jsonl"));

    assert!(session.snapshot_metadata(None).timestamp.is_some());
}

#[test]
fn navigator_is_bounded() {
    let mut nav = Navigator::new(Some(0));
    nav.next(3);
    nav.next(3);
    nav.next(3);
    assert_eq!(nav.current(), Some(2), "next stops at the last entry");
    nav.back(3);
    nav.back(3);
    nav.back(3);
    assert_eq!(nav.current(), Some(0), "back stops at the first entry");

    nav.next(0);
    assert_eq!(nav.current(), None, "an empty view forces no selection");
}

#[test]
fn preview_confirm_and_cancel() {
    let mut nav = Navigator::new(Some(0));

    nav.select_preview(9, 3);
    assert_eq!(nav.preview(), Preview::Idle, "out-of-view preview is ignored");

    nav.select_preview(2, 3);
    assert_eq!(nav.preview(), Preview::Previewing(2));
    assert_eq!(nav.current(), Some(0), "preview does not move the cursor");

    nav.cancel();
    assert_eq!(nav.preview(), Preview::Idle);
    assert_eq!(nav.current(), Some(0));

    nav.select_preview(1, 3);
    nav.stage_label(Some("fix".to_owned()));
    nav.confirm();
    assert_eq!(nav.current(), Some(1));
    assert_eq!(nav.preview(), Preview::Committed(1));
    assert_eq!(nav.staged_label(), None, "confirm drops the staged label");
}

#[test]
fn reindex_clamps_and_preserves_none() {
    let mut nav = Navigator::new(Some(4));
    nav.reindex_after_mutation(3, Some(4));
    assert_eq!(nav.current(), Some(2));

    nav.reindex_after_mutation(3, None);
    assert_eq!(nav.current(), None);

    nav.reindex_after_mutation(0, Some(1));
    assert_eq!(nav.current(), None);
}

#[test]
fn empty_session_operations_do_not_panic() {
    let mut studio = Studio::new(options());
    studio.next();
    studio.back();
    studio.delete_current();
    studio.set_label(Some("fix"));
    studio.confirm();
    studio.set_filter(Filter::OnlyFinished);
    assert_eq!(studio.current_index(), None);
    assert!(studio.view().is_empty());
    assert_eq!(studio.session().current_index(), None);
}

#[test]
fn scenario_a_unfinished_view() {
    let samples = vec![sample("a", &[]), sample("b", &["fix"]), sample("c", &[])];
    let mut studio = studio_at(samples, Some(0));
    studio.set_filter(Filter::OnlyUnfinished);

    let indices: Vec<usize> = studio.view().iter().map(|v| v.original_index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn scenario_b_delete_last_visible_item() {
    let mut studio = studio_at(unlabeled(2), Some(1));
    assert_eq!(studio.current_index(), Some(1));

    studio.delete_current();
    assert_eq!(studio.view_len(), 1);
    assert_eq!(studio.current_index(), Some(0));
    assert_eq!(studio.session().current_index(), Some(0), "cursor is written back");
}

#[test]
fn delete_clamp_law() {
    for n in 2..6 {
        for previous in 0..n {
            for target in 0..n {
                let mut studio = studio_at(unlabeled(n), Some(previous));
                studio.select_preview(target);
                studio.delete_current();

                let expected = previous.min(n - 2);
                assert_eq!(
                    studio.current_index(),
                    Some(expected),
                    "n={n} previous={previous} target={target}"
                );
                assert_eq!(studio.view_len(), n - 1);
                assert_eq!(studio.navigator().preview(), Preview::Idle);
            }
        }
    }
}

#[test]
fn deleting_the_only_sample_clears_the_cursor() {
    let mut studio = studio_at(unlabeled(1), Some(0));
    studio.delete_current();
    assert!(studio.view().is_empty());
    assert_eq!(studio.current_index(), None);
}

#[test]
fn delete_under_filter_uses_original_index() {
    let samples = vec![sample("a", &["fix"]), sample("b", &[]), sample("c", &[])];
    let mut studio = studio_at(samples, Some(0));
    studio.set_filter(Filter::OnlyUnfinished);
    assert_eq!(studio.current().unwrap().original_index, 1);

    studio.delete_current();
    assert_eq!(hashes(&studio), vec!["a", "c"], "the visible sample is removed, not raw index 0");
    assert_eq!(studio.current().unwrap().sample.commit.hash, "c");
}

#[test]
fn labeling_under_unfinished_filter_advances_to_next_sample() {
    let mut studio = studio_at(unlabeled(3), Some(0));
    studio.set_filter(Filter::OnlyUnfinished);

    studio.set_label(Some("feat"));
    assert_eq!(studio.view_len(), 2, "labeled sample leaves the view");
    assert_eq!(studio.current().unwrap().sample.commit.hash, "h1");
    assert_eq!(studio.current_label(), Some("feat"), "picked label stays staged");

    studio.next();
    assert_eq!(studio.current().unwrap().sample.commit.hash, "h2");
    assert_eq!(studio.current_label(), None, "navigation drops the staged label");
}

#[test]
fn current_label_falls_back_to_sample_label() {
    let samples = vec![sample("a", &["fix"]), sample("b", &[])];
    let studio = studio_at(samples, Some(0));
    assert_eq!(studio.current_label(), Some("fix"));
    let p = studio.presentation();
    assert_eq!(p.label_display("fix"), "Bug fix");
    assert_eq!(p.label_display("unknown"), "unknown");
}

#[test]
fn presentation_follows_filter_changes() {
    let samples = vec![sample("a", &["fix"]), sample("b", &[]), sample("c", &[]), sample("d", &["feat"])];
    let mut studio = studio_at(samples, Some(3));

    let p = studio.presentation();
    assert_eq!(p.samples.len(), 4);
    assert_eq!(p.current_index, Some(3));
    assert_eq!(p.current_label, Some("feat"));
    assert_eq!(p.filter, Filter::All);

    studio.set_filter(Filter::OnlyUnfinished);
    let p = studio.presentation();
    let indices: Vec<usize> = p.samples.iter().map(|v| v.original_index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(p.current_index, Some(1), "cursor clamps to the shorter view");
    assert_eq!(p.current_label, None);
    assert_eq!(p.filter, Filter::OnlyUnfinished);
    assert_eq!(p.progress, Progress { completed: 2, total: 4 });
    assert_eq!(p.total(), 4);
    assert_eq!(p.previewing(), None);

    studio.select_preview(0);
    assert_eq!(studio.presentation().previewing(), Some(0));
    assert_eq!(studio.presentation().preview, Preview::Previewing(0));
}

#[test]
fn filter_change_clears_preview_and_clamps() {
    let samples = vec![sample("a", &[]), sample("b", &[]), sample("c", &["fix"])];
    let mut studio = studio_at(samples, Some(2));
    studio.select_preview(1);

    studio.set_filter(Filter::OnlyFinished);
    assert_eq!(studio.navigator().preview(), Preview::Idle);
    assert_eq!(studio.current_index(), Some(0));
    assert_eq!(studio.current().unwrap().sample.commit.hash, "c");
}

#[test]
fn progress_counts_the_full_list() {
    let samples = vec![sample("a", &["fix"]), sample("b", &[]), sample("c", &["feat"]), sample("d", &[])];
    let mut studio = studio_at(samples, Some(0));
    studio.set_filter(Filter::OnlyUnfinished);

    let progress = studio.progress();
    assert_eq!(progress, Progress { completed: 2, total: 4 });
    assert_eq!(progress.percent(), 50);
    assert_eq!(Progress::default().percent(), 0);
}

#[test]
fn scenario_c_export_name_and_reimport() {
    let mut studio = Studio::new(options());
    let source = studio_core::codec::encode_bytes(
        &Metadata::default(),
        &[sample("a", &[]), sample("b", &["fix"])],
    )
    .unwrap();
    studio.import_jsonl(&source, Some("data.jsonl")).unwrap();
    studio.next();

    let export = studio.save().unwrap();
    assert_eq!(export.file_name, "data_result.jsonl");
    assert_eq!(studio.session().metadata().index, Some(1));
    assert!(studio.session().metadata().timestamp.is_some());

    let mut other = Studio::new(options());
    other.import_jsonl(&export.bytes, None).unwrap();
    assert_eq!(other.session().samples(), studio.session().samples());
    assert_eq!(other.current_index(), Some(1), "saved index is resumed");
    assert_eq!(other.session().metadata().filename.as_deref(), Some("data.jsonl"));
}

#[test]
fn reopening_an_export_keeps_the_dataset_name() {
    let mut studio = Studio::new(options());
    let source = studio_core::codec::encode_bytes(&Metadata::default(), &[sample("a", &[])]).unwrap();
    studio.import_jsonl(&source, Some("data.jsonl")).unwrap();

    let first = studio.save().unwrap();
    assert_eq!(first.file_name, "data_result.jsonl");

    studio.import_jsonl(&first.bytes, Some("data_result.jsonl")).unwrap();
    assert_eq!(studio.session().metadata().filename.as_deref(), Some("data.jsonl"));
    let second = studio.save().unwrap();
    assert_eq!(second.file_name, "data_result.jsonl");
}

#[test]
fn failed_import_keeps_prior_session() {
    let mut studio = studio_at(unlabeled(2), Some(1));
    let before = studio.session().clone();

    let err = studio.import_jsonl(b"{\"commit\":{\"hash\":\"x\",\"message\":\"m\"}}\nnot json\n", None);
    assert!(err.is_err());
    assert_eq!(studio.session(), &before);
    assert_eq!(studio.current_index(), Some(1));
}

#[test]
fn clear_resets_everything() {
    let mut studio = studio_at(unlabeled(3), Some(2));
    studio.set_filter(Filter::OnlyUnfinished);
    studio.clear();
    assert_eq!(studio.session(), &Session::default());
    assert_eq!(studio.filter(), Filter::All);
    assert_eq!(studio.current_index(), None);
}

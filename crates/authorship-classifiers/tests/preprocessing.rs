use std::io::Write;

use authorship_classifiers::config::VectorizerConfig;
use authorship_classifiers::data_handling::Column;
use authorship_classifiers::io::write_table_tsv;
use authorship_classifiers::preprocessing::{preprocess, DatasetSplit};
use authorship_classifiers::vectorize::{labels, FeatureAssembler, TfIdfVectorizer};

const TRAIN_ROWS: &str = "\
1\t@realDonaldTrump\tMake America Great Again!\t2016-03-15 14:30:00\tandroid
2\t@realDonaldTrump\tThank you Ohio! #Trump2016\t2016-03-16 09:05:00\tiphone
3\t@POTUS\tJoin me live\t2016-03-17 22:45:10\tweb
4\t@realDonaldTrump\t\t2016-03-18 10:00:00\tandroid
5\t@POTUS\tCrooked \"media\" is at it again...\t2016-03-19 07:59:00\tandroid
";

const TEST_ROWS: &str = "\
@realDonaldTrump\tWe will win!\t2017-01-20 12:00:00
@POTUS\tThank you\t2017-01-21 08:30:00
";

fn write_tmp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn train_split_drops_unknown_devices_and_empty_rows() {
    let file = write_tmp(TRAIN_ROWS);
    let table = preprocess(file.path(), DatasetSplit::Train).unwrap();

    // row 3 has device "web", row 4 an empty text
    assert_eq!(table.nrows(), 3);
    assert_eq!(table.int("device").unwrap(), &[0, 1, 0]);
    assert_eq!(table.int("user_handle_@POTUS").unwrap(), &[0, 0, 1]);
    assert_eq!(table.int("hour").unwrap(), &[14, 9, 7]);
    assert_eq!(
        table.tokens("text").unwrap()[2],
        vec!["crooked", "media", "is", "at", "it", "again"]
    );
}

#[test]
fn preprocessing_is_idempotent() {
    let file = write_tmp(TRAIN_ROWS);
    let first = preprocess(file.path(), DatasetSplit::Train).unwrap();
    let second = preprocess(file.path(), DatasetSplit::Train).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_split_has_no_label_column() {
    let file = write_tmp(TEST_ROWS);
    let table = preprocess(file.path(), DatasetSplit::Test).unwrap();
    assert_eq!(table.nrows(), 2);
    assert!(table.column("device").is_none());
    assert!(table.column("tweet_id").is_none());
    assert!(matches!(table.column("timestamp"), Some(Column::Timestamp(_))));
}

#[test]
fn processed_table_round_trips_through_tsv_header() {
    let file = write_tmp(TRAIN_ROWS);
    let table = preprocess(file.path(), DatasetSplit::Train).unwrap();

    let out = tempfile::NamedTempFile::new().unwrap();
    write_table_tsv(&table, out.path()).unwrap();
    let written = std::fs::read_to_string(out.path()).unwrap();
    let mut lines = written.lines();

    assert_eq!(lines.next().unwrap().split('\t').collect::<Vec<_>>(), table.names());
    let first_row: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(first_row[1], "make america great again");
    assert_eq!(first_row[2], "2016-03-15 14:30:00");
}

#[test]
fn train_features_feed_test_rows() {
    let train = preprocess(write_tmp(TRAIN_ROWS).path(), DatasetSplit::Train).unwrap();
    let test = preprocess(write_tmp(TEST_ROWS).path(), DatasetSplit::Test).unwrap();

    let assembler = FeatureAssembler::fit(
        &train,
        "text",
        &["user_handle".to_string(), "hour".to_string()],
        Box::new(TfIdfVectorizer::new(VectorizerConfig::default())),
    )
    .unwrap();

    let x_train = assembler.transform(&train).unwrap();
    let x_test = assembler.transform(&test).unwrap();
    assert_eq!(x_train.ncols(), x_test.ncols());
    assert_eq!(x_test.nrows(), 2);
    assert_eq!(labels(&train, "device").unwrap(), vec![0, 1, 0]);
}

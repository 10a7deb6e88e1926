use std::{
    error::Error,
    fs::File,
    io::{BufRead, BufReader, Read},
};

use arrow::{
    array::{Array, StringArray},
    record_batch::RecordBatch,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use wordlattice::training::UnigramTrainer;

/// Corpus file formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CorpusFormat {
    /// One record per line.
    Text,

    /// Comma-separated; a header row names the columns.
    Csv,

    /// Tab-separated; a header row names the columns.
    Tsv,

    /// Parquet files.
    Parquet,
}

/// Build a training record from a question/answer pair.
pub fn qa_record(
    question: &str,
    answer: &str,
) -> String {
    format!("[Q]{question}[A]{answer}")
}

/// Corpus selection arg group.
#[derive(clap::Args, Debug)]
pub struct CorpusArgs {
    /// Corpus files.
    #[arg(required = true)]
    files: Vec<String>,

    /// Corpus file format.
    #[arg(long, default_value = "text")]
    input_format: CorpusFormat,

    /// Question column, for csv, tsv and parquet inputs.
    #[arg(long, default_value = "question")]
    question_column: String,

    /// Answer column, for csv, tsv and parquet inputs.
    #[arg(long, default_value = "answer")]
    answer_column: String,
}

impl CorpusArgs {
    /// Feed every corpus file to the trainer.
    pub fn load_into(
        &self,
        trainer: &mut UnigramTrainer,
    ) -> Result<(), Box<dyn Error>> {
        log::info!("Reading shards:");
        for (idx, path) in self.files.iter().enumerate() {
            log::info!("{idx}: {path}");
            let records = match self.input_format {
                CorpusFormat::Text => read_text_records(open(path)?)?,
                CorpusFormat::Csv => read_table_records(
                    open(path)?,
                    b',',
                    &self.question_column,
                    &self.answer_column,
                )?,
                CorpusFormat::Tsv => read_table_records(
                    open(path)?,
                    b'\t',
                    &self.question_column,
                    &self.answer_column,
                )?,
                CorpusFormat::Parquet => {
                    read_parquet_records(path, &self.question_column, &self.answer_column)?
                }
            };
            log::debug!("{path}: {} records", records.len());
            trainer.update_from_samples(records);
        }
        Ok(())
    }
}

fn open(path: &str) -> Result<BufReader<File>, Box<dyn Error>> {
    Ok(BufReader::new(File::open(path)?))
}

fn column_index(
    header: &csv::StringRecord,
    name: &str,
) -> Result<usize, Box<dyn Error>> {
    header
        .iter()
        .position(|col| col.trim() == name)
        .ok_or_else(|| format!("no {name:?} column in header {header:?}").into())
}

/// One record per line.
pub fn read_text_records<R: BufRead>(reader: R) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(reader.lines().collect::<Result<Vec<String>, _>>()?)
}

/// One question/answer record per row of a delimited table.
///
/// The first row is the header. Fields may be quoted, and quoted fields
/// may hold delimiters and line breaks. Rows missing either column are skipped.
pub fn read_table_records<R: Read>(
    reader: R,
    delimiter: u8,
    question_column: &str,
    answer_column: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let header = rdr.headers()?;
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let q = column_index(header, question_column)?;
    let a = column_index(header, answer_column)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        match (row.get(q), row.get(a)) {
            (Some(question), Some(answer)) => records.push(qa_record(question, answer)),
            _ => log::warn!(
                "skipping short row at line {}",
                row.position().map_or(0, |pos| pos.line())
            ),
        }
    }
    Ok(records)
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, Box<dyn Error>> {
    batch
        .column_by_name(name)
        .ok_or_else(|| format!("failed to find {name:?} column in batch"))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| format!("column {name:?} is not a string column").into())
}

/// One question/answer record per row.
///
/// Rows with a null in either column are skipped.
pub fn read_parquet_records(
    path: &str,
    question_column: &str,
    answer_column: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let questions = string_column(&batch, question_column)?;
        let answers = string_column(&batch, answer_column)?;

        records.extend(
            questions
                .iter()
                .zip(answers.iter())
                .filter_map(|(q, a)| Some(qa_record(q?, a?))),
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::ArrayRef,
        datatypes::{DataType, Field, Schema},
    };
    use parquet::arrow::ArrowWriter;

    use super::*;

    #[test]
    fn test_qa_record() {
        assert_eq!(qa_record("why?", "because"), "[Q]why?[A]because");
    }

    #[test]
    fn test_read_text_records() {
        let records = read_text_records("one\n\ntwo three\n".as_bytes()).unwrap();
        assert_eq!(records, vec!["one", "", "two three"]);
    }

    #[test]
    fn test_read_tsv_records() {
        let tsv = "id\tquestion\tanswer\n1\twhat?\tthis\n2\tshort\n3\twho?\tme\n";
        let records = read_table_records(tsv.as_bytes(), b'\t', "question", "answer").unwrap();
        assert_eq!(records, vec!["[Q]what?[A]this", "[Q]who?[A]me"]);

        assert!(read_table_records(tsv.as_bytes(), b'\t', "q", "answer").is_err());
    }

    #[test]
    fn test_read_tsv_quoted_multiline_answer() {
        let tsv = "question\tanswer\nwhat?\t\"first line\nsecond line\"\nwho?\tme\n";
        let records = read_table_records(tsv.as_bytes(), b'\t', "question", "answer").unwrap();
        assert_eq!(
            records,
            vec!["[Q]what?[A]first line\nsecond line", "[Q]who?[A]me"]
        );
    }

    #[test]
    fn test_read_csv_records() {
        let table = concat!(
            "question,answer\r\n",
            "\"x, y or z?\",\"x, then\nthe \"\"rest\"\"\"\r\n",
            "why?,because\r\n",
        );
        let records = read_table_records(table.as_bytes(), b',', "question", "answer").unwrap();
        assert_eq!(
            records,
            vec![
                "[Q]x, y or z?[A]x, then\nthe \"rest\"",
                "[Q]why?[A]because",
            ]
        );
    }

    #[test]
    fn test_read_parquet_records() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("question", DataType::Utf8, true),
            Field::new("answer", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("what?"), None, Some("who?")])) as ArrayRef,
                Arc::new(StringArray::from(vec![Some("this"), Some("lost"), Some("me")])) as ArrayRef,
            ],
        )
        .unwrap();

        tempdir::TempDir::new("corpus_test")
            .and_then(|dir| {
                let path = dir.path().join("corpus.parquet");

                let mut writer =
                    ArrowWriter::try_new(File::create(&path)?, schema, None).unwrap();
                writer.write(&batch).unwrap();
                writer.close().unwrap();

                let records =
                    read_parquet_records(path.to_str().unwrap(), "question", "answer").unwrap();
                assert_eq!(records, vec!["[Q]what?[A]this", "[Q]who?[A]me"]);

                Ok(())
            })
            .unwrap();
    }
}

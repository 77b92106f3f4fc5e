//! The synchronization engine: walks every book's words in order, keeps
//! courses under their item ceiling, skips anything already on the service,
//! and records what could not be uploaded.

use std::{
    collections::{
        BTreeMap,
        HashSet,
    },
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Arc,
    },
};

use crate::{
    checkpoint::{
        Checkpoint,
        CourseCursor,
        ItemFailure,
        SampleFailure,
    },
    core::{
        Book,
        OkurigoError,
        WordRecord,
    },
    pos,
    translit::Transliterator,
};


/// The service recommends custom courses stay at or under 100 items.
pub const COURSE_CAPACITY: u32 = 100;

/// Result of an item-creation request that got a success status back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The service created the flashcard and reported its id.
    Created { item_id: String },
    /// Success status but an undecodable body: the item may exist remotely,
    /// so there is no id to attach a sample to and no proof to commit on.
    Unconfirmed,
}

/// The remote operations the engine drives. The service is unofficial, so
/// calls are issued strictly one at a time; every call is awaited to
/// completion before the next is sent.
#[allow(async_fn_in_trait)]
pub trait CourseClient {
    async fn create_course(&self, title: &str, number: u32) -> Result<String, OkurigoError>;

    async fn create_item(
        &self,
        course_id: &str,
        word: &WordRecord,
        pos_code: &str,
    ) -> Result<ItemOutcome, OkurigoError>;

    async fn attach_sample(
        &self,
        course_id: &str,
        item_id: &str,
        sentence: &str,
        transliteration: &str,
        translation: &str,
    ) -> Result<(), OkurigoError>;
}

/// Cooperative stop flag shared between the ctrl-c handler and the engine.
/// The handler only sets the flag; the engine checks it between remote calls
/// and unwinds so the caller can persist the checkpoint.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Engine-private state threaded through a run and folded back into a
/// checkpoint at the end.
struct RunState {
    committed: HashSet<String>,
    cursors: BTreeMap<String, CourseCursor>,
    not_added: Vec<ItemFailure>,
    no_sample: Vec<SampleFailure>,
}

impl RunState {
    fn from_checkpoint(checkpoint: &Checkpoint) -> Self {
        Self {
            committed: checkpoint.added.iter().cloned().collect(),
            cursors: checkpoint
                .courses
                .iter()
                .map(|cursor| (cursor.title.clone(), cursor.clone()))
                .collect(),
            // Failures are per run: a re-run with the same word source
            // re-attempts the prior ones anyway.
            not_added: Vec::new(),
            no_sample: Vec::new(),
        }
    }

    fn into_checkpoint(self) -> Checkpoint {
        let mut added: Vec<String> = self.committed.into_iter().collect();
        added.sort();

        Checkpoint {
            added,
            courses: self.cursors.into_values().collect(),
            not_added: self.not_added,
            no_sample: self.no_sample,
        }
    }
}

pub struct SyncEngine<C, T> {
    client: C,
    transliterator: T,
    interrupt: Interrupt,
}

impl<C: CourseClient, T: Transliterator> SyncEngine<C, T> {
    pub fn new(client: C, transliterator: T, interrupt: Interrupt) -> Self {
        Self { client, transliterator, interrupt }
    }

    /// Drives every book through the service and returns the checkpoint to
    /// persist. Words already committed in `checkpoint` are never re-sent;
    /// cursors for books not in `books` carry over untouched.
    pub async fn run(&self, books: &[Book], checkpoint: &Checkpoint) -> Checkpoint {
        let mut state = RunState::from_checkpoint(checkpoint);

        for book in books {
            if self.interrupt.is_triggered() {
                println!("Stopping before '{}': interrupt requested.", book.title);
                break;
            }
            self.sync_book(book, &mut state).await;
        }

        state.into_checkpoint()
    }

    async fn sync_book(&self, book: &Book, state: &mut RunState) {
        let mut cursor = state
            .cursors
            .get(&book.title)
            .cloned()
            .unwrap_or_else(|| CourseCursor::new(&book.title));

        if cursor.cur_course_id.is_empty() {
            match self.client.create_course(&book.title, cursor.number).await {
                Ok(course_id) => cursor.cur_course_id = course_id,
                Err(e) => {
                    eprintln!(
                        "Unable to make a first course for '{}' ({}). Moving on to the next book.",
                        book.title, e
                    );
                    return;
                }
            }
        }

        println!("Importing '{}' ({} words)...", book.title, book.words.len());

        for word in &book.words {
            if self.interrupt.is_triggered() {
                println!("Stopping '{}' early: interrupt requested.", book.title);
                break;
            }
            self.sync_word(word, &mut cursor, state).await;
        }

        state.cursors.insert(book.title.clone(), cursor);
    }

    async fn sync_word(&self, word: &WordRecord, cursor: &mut CourseCursor, state: &mut RunState) {
        if state.committed.contains(&word.word) {
            return;
        }

        if word.has_sentinel_fields() {
            eprintln!("Either bad reading or definition for '{}', not uploading.", word.word);
            state.not_added.push(ItemFailure {
                course: cursor.course_name(),
                course_id: cursor.cur_course_id.clone(),
                word: word.word.clone(),
            });
            return;
        }

        if cursor.items >= COURSE_CAPACITY {
            self.roll_over(cursor).await;
        }

        let pos_code = pos::resolve_code(&word.part_of_speech);

        let item_id = match self.client.create_item(&cursor.cur_course_id, word, pos_code).await {
            Ok(ItemOutcome::Created { item_id }) => item_id,
            Ok(ItemOutcome::Unconfirmed) => {
                eprintln!(
                    "Could not confirm creation of '{}'; leaving it for the next run.",
                    word.word
                );
                return;
            }
            Err(e) => {
                eprintln!("Failed to post new word '{}': {}", word.word, e);
                state.not_added.push(ItemFailure {
                    course: cursor.course_name(),
                    course_id: cursor.cur_course_id.clone(),
                    word: word.word.clone(),
                });
                return;
            }
        };

        state.committed.insert(word.word.clone());
        cursor.items += 1;

        let transliteration = match self.transliterator.transliterate(&word.sample) {
            Ok(rendered) if !rendered.trim().is_empty() => rendered,
            Ok(_) | Err(_) => {
                eprintln!("No transliteration for the sample of '{}', skipping it.", word.word);
                state.no_sample.push(SampleFailure {
                    course: cursor.course_name(),
                    course_id: cursor.cur_course_id.clone(),
                    word: word.word.clone(),
                    word_id: item_id,
                    sentence: word.sample.clone(),
                });
                return;
            }
        };

        if let Err(e) = self
            .client
            .attach_sample(
                &cursor.cur_course_id,
                &item_id,
                &word.sample,
                &transliteration,
                &word.definition,
            )
            .await
        {
            eprintln!("Couldn't add the sample sentence for '{}': {}", word.word, e);
            state.no_sample.push(SampleFailure {
                course: cursor.course_name(),
                course_id: cursor.cur_course_id.clone(),
                word: word.word.clone(),
                word_id: item_id,
                sentence: word.sample.clone(),
            });
        }
    }

    /// Opens the next course segment once the current one is full. When the
    /// service refuses, the current course keeps filling past its ceiling
    /// rather than dropping the word; the next word retries the rollover.
    async fn roll_over(&self, cursor: &mut CourseCursor) {
        let next = cursor.number + 1;
        match self.client.create_course(&cursor.title, next).await {
            Ok(course_id) => {
                cursor.cur_course_id = course_id;
                cursor.number = next;
                cursor.items = 0;
            }
            Err(e) => {
                eprintln!(
                    "Unable to make a new course for '{}' ({}). Adding to the existing course.",
                    cursor.title, e
                );
            }
        }
    }
}

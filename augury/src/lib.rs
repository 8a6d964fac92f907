/*! Predictive text for keyboards and editors.

Augury suggests completions and corrections for a partially typed word,
ranked by how closely they spell the input and by how likely they are to
follow the words already typed.

The pipeline has three parts:

* a [DAWG](dawg) holding the vocabulary, searched with a bounded
  edit-distance walk ([speller]),
* a [bounded Jaro-Winkler](metric) similarity used to rank spelling
  candidates cheaply,
* a [Modified Kneser-Ney](model) trigram language model scoring candidates
  against the preceding words.

[`Auger`](predictor::Auger) ties them together. Build one from a corpus with
[`AugerBuilder`](corpus::AugerBuilder), or load a saved snapshot with
[`Auger::open`](predictor::Auger::open).
*/

pub mod corpus;
pub mod dawg;
pub mod metric;
pub mod model;
pub mod predictor;
pub mod snapshot;
pub mod speller;
pub mod tokenizer;
pub mod types;

pub(crate) mod constants;

pub use predictor::{Auger, Predictor, PredictorConfig};

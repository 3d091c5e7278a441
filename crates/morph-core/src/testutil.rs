//! Shared fixture dictionary for unit tests.
//!
//! Tag ids:
//!   0 UNKN
//!   1 INFN,perf,intr        2 GRND,perf,intr,refl
//!   3 INFN,impf,tran        4 GRND,impf,tran,refl
//!   5 NOUN,femn,sing,nom    6 NOUN,femn,sing,gen
//!   7 NOUN,masc,sing,nom    8 NOUN,masc,sing,gen
//!   9 NOUN,masc,sing,dat   10 VERB,perf,intr,past,plur
//!
//! Paradigms:
//!   0 -иться/-ившись   stems свар слом гор луч мир тиш зал
//!   1 -ить/-ившись     stems коп дав мол
//!   2 -а/-и            stem  кошк
//!   3 ∅/-а/-у          stem  кот
//!   4 -ь/-и            stem  стал
//!   5 -ть/-ли          stem  ста
//!
//! "стали" is a homonym of paradigms 4 and 5. The ending "ившись" is seen
//! 7 times in paradigm 0 and 3 times in paradigm 1.

use crate::dict::{BundleBuilder, DictionaryBundle, DictionaryStore};
use crate::paradigm::{Paradigm, Rule};

pub const TAGS: [&str; 11] = [
    "UNKN",
    "INFN,perf,intr",
    "GRND,perf,intr,refl",
    "INFN,impf,tran",
    "GRND,impf,tran,refl",
    "NOUN,femn,sing,nom",
    "NOUN,femn,sing,gen",
    "NOUN,masc,sing,nom",
    "NOUN,masc,sing,gen",
    "NOUN,masc,sing,dat",
    "VERB,perf,intr,past,plur",
];

pub const REFLEXIVE_STEMS: [&str; 7] = ["свар", "слом", "гор", "луч", "мир", "тиш", "зал"];
pub const TRANSITIVE_STEMS: [&str; 3] = ["коп", "дав", "мол"];

/// Every `(stem, paradigm_id)` pair in the fixture.
pub fn lexemes() -> Vec<(&'static str, u16)> {
    let mut out: Vec<(&str, u16)> = REFLEXIVE_STEMS.iter().map(|s| (*s, 0)).collect();
    out.extend(TRANSITIVE_STEMS.iter().map(|s| (*s, 1)));
    out.extend([("кошк", 2), ("кот", 3), ("стал", 4), ("ста", 5)]);
    out
}

pub fn ru_builder() -> BundleBuilder {
    let mut b = BundleBuilder::new("ru");
    for tag in &TAGS[1..] {
        b.tag(tag);
    }
    let paradigms = [
        Paradigm::new(vec![Rule::new("", "иться", 1), Rule::new("", "ившись", 2)], 0),
        Paradigm::new(vec![Rule::new("", "ить", 3), Rule::new("", "ившись", 4)], 0),
        Paradigm::new(vec![Rule::new("", "а", 5), Rule::new("", "и", 6)], 0),
        Paradigm::new(
            vec![Rule::new("", "", 7), Rule::new("", "а", 8), Rule::new("", "у", 9)],
            0,
        ),
        Paradigm::new(vec![Rule::new("", "ь", 5), Rule::new("", "и", 6)], 0),
        Paradigm::new(vec![Rule::new("", "ть", 1), Rule::new("", "ли", 10)], 0),
    ];
    for p in paradigms {
        b.paradigm(p);
    }
    for (stem, paradigm_id) in lexemes() {
        b.lexeme(stem, paradigm_id);
    }
    b
}

pub fn ru_bundle() -> DictionaryBundle {
    ru_builder().build().unwrap()
}

pub fn ru_store() -> DictionaryStore {
    DictionaryStore::open(&ru_bundle()).unwrap()
}

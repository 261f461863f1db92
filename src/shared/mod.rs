mod ascii_fold;

pub use ascii_fold::fold_to_ascii;

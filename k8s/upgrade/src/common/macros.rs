/// Collects expressions which implement ToString into a Vec<String>, e.g. for command arguments.
#[macro_export]
macro_rules! vec_to_strings {
    ($($x:expr),* $(,)?) => (vec![$($x.to_string()),*]);
}

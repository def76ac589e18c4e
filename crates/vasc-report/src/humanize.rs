/// Display form of a segment key: underscores become spaces and each word is
/// title-cased, e.g. "prox_ica_right" → "Prox Ica Right".
///
/// A letter is upper-cased when it does not follow another letter and
/// lower-cased when it does, so "cca2nd" becomes "Cca2Nd".
pub fn humanize_segment(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut after_letter = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

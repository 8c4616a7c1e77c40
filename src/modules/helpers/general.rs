pub struct Helpers {}

impl Helpers {
    /// # abbreviate a name
    /// `Greg Kachadurian` becomes `G. Kachadurian`, single word names are kept as is
    ///
    /// ## Arguments
    /// * `name` - the full name
    ///
    /// ## Returns
    /// * 'String' - the abbreviated name
    pub fn abbreviate_name(name: &str) -> String {
        let mut parts = name.split_whitespace();
        let first = match parts.next() {
            Some(first) => first,
            None => return name.to_string(),
        };

        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            return first.to_string();
        }

        match first.chars().next() {
            Some(initial) => format!("{}. {}", initial, rest.join(" ")),
            None => rest.join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Helpers;

    #[test]
    fn abbreviates_first_name() {
        assert_eq!(Helpers::abbreviate_name("Greg Kachadurian"), "G. Kachadurian");
        assert_eq!(Helpers::abbreviate_name("Jean Eric Vergne"), "J. Eric Vergne");
        assert_eq!(Helpers::abbreviate_name("Émile  Zola"), "É. Zola");
    }

    #[test]
    fn keeps_single_names() {
        assert_eq!(Helpers::abbreviate_name("Kimi"), "Kimi");
        assert_eq!(Helpers::abbreviate_name(""), "");
    }
}

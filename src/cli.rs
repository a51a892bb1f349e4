use clap::Parser;

use crate::app::ThemeName;

#[derive(Parser, Debug)]
#[command(
    name = "tlp-boost",
    version,
    about = "A simple terminal UI to enable `tlp fullcharge`."
)]
pub struct UserArgs {
    /// Color theme
    #[arg(short = 't', long, value_enum, default_value_t = ThemeName::Light)]
    pub theme: ThemeName,

    /// Font size level (1=smallest, 5=largest), mapped to UI spacing
    #[arg(
        short = 'f',
        long,
        value_parser = clap::value_parser!(u8).range(1..=5),
        default_value_t = 3
    )]
    pub font_size: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_light_theme_and_mid_size() {
        let args = UserArgs::parse_from(["tlp-boost"]);
        assert_eq!(args.theme, ThemeName::Light);
        assert_eq!(args.font_size, 3);
    }

    #[test]
    fn font_size_outside_range_is_rejected() {
        assert!(UserArgs::try_parse_from(["tlp-boost", "-f", "6"]).is_err());
        assert!(UserArgs::try_parse_from(["tlp-boost", "-f", "0"]).is_err());
        assert!(UserArgs::try_parse_from(["tlp-boost", "-f", "5"]).is_ok());
    }

    #[test]
    fn theme_flag_accepts_both_themes() {
        let args = UserArgs::parse_from(["tlp-boost", "--theme", "dark"]);
        assert_eq!(args.theme, ThemeName::Dark);
    }
}

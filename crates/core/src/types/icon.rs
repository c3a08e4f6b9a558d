//! Service icons.
//!
//! Editors pick an icon by its symbolic name. Only the names below are
//! rendered; anything else resolves to [`ServiceIcon::HelpCircle`].

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! service_icons {
    ($($variant:ident => $name:literal, $class:literal;)+) => {
        /// The closed set of icons a service card can show.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum ServiceIcon {
            $($variant,)+
            /// Fallback for unresolved names.
            #[default]
            HelpCircle,
        }

        impl ServiceIcon {
            /// Every supported icon, fallback last.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+ Self::HelpCircle];

            /// Resolve a symbolic name, falling back to `HelpCircle`.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                match name.trim() {
                    $($name => Self::$variant,)+
                    _ => Self::HelpCircle,
                }
            }

            /// The symbolic name stored in the `icon` column.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                    Self::HelpCircle => "HelpCircle",
                }
            }

            /// Kebab-case class suffix used by the stylesheet sprite.
            #[must_use]
            pub const fn css_class(self) -> &'static str {
                match self {
                    $(Self::$variant => $class,)+
                    Self::HelpCircle => "help-circle",
                }
            }
        }
    };
}

service_icons! {
    Layers => "Layers", "layers";
    Shield => "Shield", "shield";
    ShieldCheck => "ShieldCheck", "shield-check";
    Server => "Server", "server";
    Cloud => "Cloud", "cloud";
    Cpu => "Cpu", "cpu";
    Database => "Database", "database";
    HardDrive => "HardDrive", "hard-drive";
    Laptop => "Laptop", "laptop";
    Monitor => "Monitor", "monitor";
    Network => "Network", "network";
    Wifi => "Wifi", "wifi";
    Lock => "Lock", "lock";
    Headphones => "Headphones", "headphones";
    Wrench => "Wrench", "wrench";
    Settings => "Settings", "settings";
    Code => "Code", "code";
    Globe => "Globe", "globe";
    Mail => "Mail", "mail";
    Phone => "Phone", "phone";
    Users => "Users", "users";
    BarChart => "BarChart", "bar-chart";
    Zap => "Zap", "zap";
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ServiceIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ServiceIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_resolve() {
        assert_eq!(ServiceIcon::from_name("ShieldCheck"), ServiceIcon::ShieldCheck);
        assert_eq!(ServiceIcon::from_name(" Cloud "), ServiceIcon::Cloud);
        assert_eq!(ServiceIcon::ShieldCheck.css_class(), "shield-check");
    }

    #[test]
    fn test_unknown_names_fall_back() {
        assert_eq!(ServiceIcon::from_name("Rocket"), ServiceIcon::HelpCircle);
        assert_eq!(ServiceIcon::from_name(""), ServiceIcon::HelpCircle);
        assert_eq!(ServiceIcon::default(), ServiceIcon::HelpCircle);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in ServiceIcon::ALL.iter().enumerate() {
            for b in ServiceIcon::ALL.iter().skip(i + 1) {
                assert_ne!(a.name(), b.name());
            }
            assert_eq!(ServiceIcon::from_name(a.name()), *a);
        }
    }

    #[test]
    fn test_serde_uses_symbolic_name() {
        let json = serde_json::to_string(&ServiceIcon::BarChart).unwrap();
        assert_eq!(json, "\"BarChart\"");
        let parsed: ServiceIcon = serde_json::from_str("\"NotAnIcon\"").unwrap();
        assert_eq!(parsed, ServiceIcon::HelpCircle);
    }
}

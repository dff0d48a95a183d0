//! Coded enumerations used by the static tables.
//!
//! Each enum keeps an `Unrecognized(code)` case. Whether such a value is
//! accepted or reported is decided by the loader's [`UnknownEnumPolicy`].
//!
//! [`UnknownEnumPolicy`]: super::UnknownEnumPolicy

/// An enum read from an integer column.
pub(crate) trait Coded: Copy {
    fn from_code(code: i32) -> Self;
    fn code(&self) -> i32;
    fn is_recognized(&self) -> bool;
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            Unrecognized(i32),
        }

        impl Coded for $name {
            fn from_code(code: i32) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unrecognized(other),
                }
            }

            fn code(&self) -> i32 {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unrecognized(code) => *code,
                }
            }

            fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }
        }

        impl $name {
            pub fn from_code(code: i32) -> Self {
                <Self as Coded>::from_code(code)
            }

            pub fn code(&self) -> i32 {
                Coded::code(self)
            }

            pub fn is_recognized(&self) -> bool {
                Coded::is_recognized(self)
            }
        }
    };
}

/// Mode of transport for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
    /// A code from the extended route type range (100 to 1799).
    Extended(i32),
    Unrecognized(i32),
}

impl RouteType {
    pub fn from_code(code: i32) -> Self {
        <Self as Coded>::from_code(code)
    }

    pub fn code(&self) -> i32 {
        Coded::code(self)
    }

    pub fn is_recognized(&self) -> bool {
        Coded::is_recognized(self)
    }
}

impl Coded for RouteType {
    fn from_code(code: i32) -> Self {
        match code {
            0 => RouteType::Tram,
            1 => RouteType::Subway,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableTram,
            6 => RouteType::AerialLift,
            7 => RouteType::Funicular,
            11 => RouteType::Trolleybus,
            12 => RouteType::Monorail,
            100..=1799 => RouteType::Extended(code),
            other => RouteType::Unrecognized(other),
        }
    }

    fn code(&self) -> i32 {
        match self {
            RouteType::Tram => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableTram => 5,
            RouteType::AerialLift => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
            RouteType::Extended(code) | RouteType::Unrecognized(code) => *code,
        }
    }

    fn is_recognized(&self) -> bool {
        !matches!(self, RouteType::Unrecognized(_))
    }
}

coded_enum! {
    /// Role of a row in `stops`.
    #[derive(Default)]
    LocationType {
        #[default]
        Stop = 0,
        Station = 1,
        Entrance = 2,
        GenericNode = 3,
        BoardingArea = 4,
    }
}

coded_enum! {
    /// Tri-state used for wheelchair boarding, wheelchair accessibility and
    /// bike carriage.
    #[derive(Default)]
    Availability {
        #[default]
        Unknown = 0,
        Available = 1,
        Unavailable = 2,
    }
}

coded_enum! {
    DirectionId {
        Outbound = 0,
        Inbound = 1,
    }
}

coded_enum! {
    /// How passengers board or alight at a stop time.
    #[derive(Default)]
    PickupDropOff {
        #[default]
        Regular = 0,
        NoneAvailable = 1,
        PhoneAgency = 2,
        CoordinateWithDriver = 3,
    }
}

coded_enum! {
    #[derive(Default)]
    Timepoint {
        Approximate = 0,
        #[default]
        Exact = 1,
    }
}

coded_enum! {
    /// Whether a calendar date adds or removes service.
    ExceptionType {
        Added = 1,
        Removed = 2,
    }
}

impl LocationType {
    /// Stops, stations and entrances must carry coordinates.
    pub fn requires_coordinate(&self) -> bool {
        matches!(
            self,
            LocationType::Stop | LocationType::Station | LocationType::Entrance
        )
    }

    /// Entrances, generic nodes and boarding areas must have a parent.
    pub fn requires_parent(&self) -> bool {
        matches!(
            self,
            LocationType::Entrance | LocationType::GenericNode | LocationType::BoardingArea
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_types() {
        assert_eq!(RouteType::from_code(3), RouteType::Bus);
        assert_eq!(RouteType::from_code(12), RouteType::Monorail);
        assert_eq!(RouteType::from_code(700), RouteType::Extended(700));
        assert_eq!(RouteType::from_code(1799), RouteType::Extended(1799));
        assert_eq!(RouteType::from_code(8), RouteType::Unrecognized(8));
        assert_eq!(RouteType::from_code(1800), RouteType::Unrecognized(1800));
        assert!(RouteType::Extended(100).is_recognized());
        assert!(!RouteType::Unrecognized(9).is_recognized());
        assert_eq!(RouteType::Extended(715).code(), 715);
    }

    #[test]
    fn coded_enums() {
        assert_eq!(LocationType::from_code(4), LocationType::BoardingArea);
        assert_eq!(LocationType::from_code(5), LocationType::Unrecognized(5));
        assert_eq!(ExceptionType::from_code(0), ExceptionType::Unrecognized(0));
        assert_eq!(PickupDropOff::from_code(3).code(), 3);
        assert!(!DirectionId::from_code(2).is_recognized());
    }

    #[test]
    fn gtfs_defaults() {
        assert_eq!(LocationType::default(), LocationType::Stop);
        assert_eq!(Availability::default(), Availability::Unknown);
        assert_eq!(PickupDropOff::default(), PickupDropOff::Regular);
        assert_eq!(Timepoint::default(), Timepoint::Exact);
    }

    #[test]
    fn location_rules() {
        assert!(LocationType::Station.requires_coordinate());
        assert!(!LocationType::GenericNode.requires_coordinate());
        assert!(LocationType::BoardingArea.requires_parent());
        assert!(!LocationType::Stop.requires_parent());
    }
}

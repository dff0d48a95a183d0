//! GTFS-realtime enumerations.
//!
//! Protocol enums are open: publishers may send codes added in later
//! protocol versions. Each type therefore has one case per known code plus
//! `Unrecognized(code)`, which keeps the raw value instead of failing.

macro_rules! protocol_enum {
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
            /// A code this version of the schema does not know.
            Unrecognized(i32),
        }

        impl $name {
            pub fn from_code(code: i32) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unrecognized(other),
                }
            }

            pub fn code(&self) -> i32 {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unrecognized(code) => *code,
                }
            }
        }
    };
}

protocol_enum! {
    /// Whether a feed message replaces all prior state or amends it.
    #[derive(Default)]
    Incrementality {
        #[default]
        FullDataset = 0,
        Differential = 1,
    }
}

protocol_enum! {
    /// How a realtime trip relates to the static schedule.
    TripScheduleRelationship {
        Scheduled = 0,
        Added = 1,
        Unscheduled = 2,
        Canceled = 3,
        Replacement = 5,
        Duplicated = 6,
        Deleted = 7,
    }
}

protocol_enum! {
    /// How a single stop prediction relates to the static schedule.
    #[derive(Default)]
    StopTimeScheduleRelationship {
        #[default]
        Scheduled = 0,
        Skipped = 1,
        NoData = 2,
        Unscheduled = 3,
    }
}

protocol_enum! {
    /// Where a vehicle is relative to its current stop.
    VehicleStopStatus {
        IncomingAt = 0,
        StoppedAt = 1,
        InTransitTo = 2,
    }
}

protocol_enum! {
    CongestionLevel {
        UnknownCongestionLevel = 0,
        RunningSmoothly = 1,
        StopAndGo = 2,
        Congestion = 3,
        SevereCongestion = 4,
    }
}

protocol_enum! {
    OccupancyStatus {
        Empty = 0,
        ManySeatsAvailable = 1,
        FewSeatsAvailable = 2,
        StandingRoomOnly = 3,
        CrushedStandingRoomOnly = 4,
        Full = 5,
        NotAcceptingPassengers = 6,
        NoDataAvailable = 7,
        NotBoardable = 8,
    }
}

protocol_enum! {
    #[derive(Default)]
    Cause {
        #[default]
        UnknownCause = 1,
        OtherCause = 2,
        TechnicalProblem = 3,
        Strike = 4,
        Demonstration = 5,
        Accident = 6,
        Holiday = 7,
        Weather = 8,
        Maintenance = 9,
        Construction = 10,
        PoliceActivity = 11,
        MedicalEmergency = 12,
    }
}

protocol_enum! {
    #[derive(Default)]
    Effect {
        NoService = 1,
        ReducedService = 2,
        SignificantDelays = 3,
        Detour = 4,
        AdditionalService = 5,
        ModifiedService = 6,
        OtherEffect = 7,
        #[default]
        UnknownEffect = 8,
        StopMoved = 9,
        NoEffect = 10,
        AccessibilityIssue = 11,
    }
}

protocol_enum! {
    #[derive(Default)]
    SeverityLevel {
        #[default]
        UnknownSeverity = 1,
        Info = 2,
        Warning = 3,
        Severe = 4,
    }
}

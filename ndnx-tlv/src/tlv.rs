//! TLV type number registry.
//!
//! Standard NDN numbers are used where they exist. The replication
//! extension packets and their fields live in the application range
//! (200-239); NFD management numbers follow the NFD registry.

/// Name.
pub const NAME: u64 = 7;
/// GenericNameComponent.
pub const NAME_COMPONENT: u64 = 8;
/// Nonce.
pub const NONCE: u64 = 10;
/// Exclude.
pub const EXCLUDE: u64 = 16;
/// MustBeFresh.
pub const MUST_BE_FRESH: u64 = 18;
/// Any (inside Exclude).
pub const ANY: u64 = 19;
/// Content. Outer type of a ForwarderStatus payload.
pub const CONTENT: u64 = 21;

// Extension packets (0xC8..)
pub const ANNOUNCEMENT: u64 = 200;
pub const HINT: u64 = 201;
pub const VICINITY: u64 = 202;
pub const VICINITY_DATA: u64 = 203;
pub const REPLICATION_SELECTORS: u64 = 204;
pub const STRATEGY_SELECTORS: u64 = 205;
pub const PDRM_STRATEGY_SELECTORS: u64 = 206;
/// Legacy name+size Hint schema.
pub const LEGACY_HINT: u64 = 207;
/// Legacy Exclude/MustBeFresh replication selectors.
pub const LEGACY_REPLICATION_SELECTORS: u64 = 208;

// Extension fields
pub const TIMEOUT: u64 = 210;
pub const HINT_SCOPE: u64 = 211;
pub const SCOPE: u64 = 212;
pub const SIZE: u64 = 213;
pub const NODE_ID: u64 = 214;
pub const INTERESTED: u64 = 215;
pub const AVAILABILITY: u64 = 216;

// PDRM strategy selector fields
pub const PDRM_SCOPE: u64 = 220;
pub const PDRM_NODE_ID: u64 = 221;
pub const PDRM_HOME_NETWORK: u64 = 222;
pub const PDRM_PREFERRED_LOCATION: u64 = 223;
pub const PDRM_TIME_SPENT_AT_PREFERRED_LOCATION: u64 = 224;
pub const PDRM_CURRENT_POSITION: u64 = 225;
pub const PDRM_AVAILABILITY: u64 = 226;
pub const PDRM_INTEREST: u64 = 227;

/// NFD management TLV numbers.
pub mod nfd {
    // FaceStatus
    pub const FACE_STATUS: u64 = 128;
    pub const FACE_ID: u64 = 105;
    pub const URI: u64 = 114;
    pub const LOCAL_URI: u64 = 129;
    pub const EXPIRATION_PERIOD: u64 = 109;
    pub const FACE_SCOPE: u64 = 132;
    pub const FACE_PERSISTENCY: u64 = 133;
    pub const LINK_TYPE: u64 = 134;

    // Traffic counters
    pub const N_IN_INTERESTS: u64 = 144;
    pub const N_IN_DATAS: u64 = 145;
    pub const N_OUT_INTERESTS: u64 = 146;
    pub const N_OUT_DATAS: u64 = 147;
    pub const N_IN_BYTES: u64 = 148;
    pub const N_OUT_BYTES: u64 = 149;

    // Extension traffic counters
    pub const N_IN_ANNOUNCEMENTS: u64 = 176;
    pub const N_IN_HINTS: u64 = 177;
    pub const N_IN_VICINITIES: u64 = 178;
    pub const N_IN_VICINITY_DATAS: u64 = 179;
    pub const N_OUT_ANNOUNCEMENTS: u64 = 180;
    pub const N_OUT_HINTS: u64 = 181;
    pub const N_OUT_VICINITIES: u64 = 182;
    pub const N_OUT_VICINITY_DATAS: u64 = 183;

    // ForwarderStatus
    pub const NFD_VERSION: u64 = 128;
    pub const START_TIMESTAMP: u64 = 129;
    pub const CURRENT_TIMESTAMP: u64 = 130;
    pub const N_NAME_TREE_ENTRIES: u64 = 131;
    pub const N_FIB_ENTRIES: u64 = 132;
    pub const N_PIT_ENTRIES: u64 = 133;
    pub const N_MEASUREMENTS_ENTRIES: u64 = 134;
    pub const N_CS_ENTRIES: u64 = 135;
}

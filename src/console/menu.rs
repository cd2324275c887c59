//! The main menu: what can be chosen and how a selection is read.

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Show the logged-in member
    MemberDetails,
    /// Look an item up
    ItemDetails,
    /// Scan items and check out
    Buy,
    /// Show the member's bill
    Bill,
    /// Register a member (admin)
    AddMember,
    /// Remove a member (admin)
    RemoveMember,
    /// Grant or revoke admin rights (admin)
    UpdateAdmin,
    /// Add an item (admin)
    NewItem,
    /// Remove an item (admin)
    ExileItem,
    /// Change an item's cost (admin)
    ChangeCost,
    /// Set an item's stock (admin)
    TopUpStock,
    /// Leave
    Quit,
}

/// Menu text, one entry per line.
pub const MENU_LINES: [&str; 12] = [
    "(G)et member details",
    "(D)etails of an item",
    "(B)uy items",
    "(S)ee bill",
    "(A)dd member",
    "(R)emove member",
    "(U)pdate admin status",
    "(N)ew item",
    "(E)xile item",
    "(C)hange item cost",
    "(T)op up stock",
    "(Q)uit",
];

/// Shown when a selection matches nothing.
pub const MENU_HINT: &str = "Please type one of G, D, B, S, A, R, U, N, E, C, T or Q";

impl MenuChoice {
    /// Reads a selection from its first character, ignoring case.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let first = input.trim().chars().next()?.to_ascii_uppercase();
        let choice = match first {
            'G' => Self::MemberDetails,
            'D' => Self::ItemDetails,
            'B' => Self::Buy,
            'S' => Self::Bill,
            'A' => Self::AddMember,
            'R' => Self::RemoveMember,
            'U' => Self::UpdateAdmin,
            'N' => Self::NewItem,
            'E' => Self::ExileItem,
            'C' => Self::ChangeCost,
            'T' => Self::TopUpStock,
            'Q' => Self::Quit,
            _ => return None,
        };
        Some(choice)
    }

    /// Whether the entry edits a directory and so needs an admin.
    #[must_use]
    pub const fn needs_admin(self) -> bool {
        matches!(
            self,
            Self::AddMember
                | Self::RemoveMember
                | Self::UpdateAdmin
                | Self::NewItem
                | Self::ExileItem
                | Self::ChangeCost
                | Self::TopUpStock
        )
    }
}

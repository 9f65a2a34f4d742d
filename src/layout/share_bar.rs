use crate::{
    log::aggregate::{GroupKey, GroupTotal},
    utils::percentage::Percentage,
};

use super::{
    colouring::Colouring,
    primitives::{Labelled, TimelineSegment},
};

/// Single row split between groups, each block as wide as the group's share. The shares are
/// taken as supplied; only their sum is used to scale them to 100.
pub fn share_bar(
    shares: &[GroupTotal],
    key: GroupKey,
    colouring: &Colouring,
) -> Vec<Labelled<TimelineSegment>> {
    let total: f64 = shares.iter().map(|v| v.hours).sum();
    shares
        .iter()
        .filter_map(|share| {
            Some(Labelled {
                label: share.key.clone(),
                segment: TimelineSegment {
                    colour: colouring.group(key, &share.key),
                    width: Percentage::of(share.hours, total)?,
                    margin: Percentage::ZERO,
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::share_bar;
    use crate::{
        layout::colouring::Colouring,
        log::aggregate::{GroupKey, GroupTotal},
    };

    #[test]
    fn widths_follow_shares() {
        let shares = [GroupTotal::new("Code", 60.), GroupTotal::new("Read", 40.)];
        let bar = share_bar(&shares, GroupKey::Sector, &Colouring::plain("#fff"));
        assert_eq!(&*bar[0].label, "Code");
        assert_eq!(*bar[0].segment.width, 60.);
        assert_eq!(&*bar[1].label, "Read");
        assert_eq!(*bar[1].segment.width, 40.);
        assert!(bar.iter().all(|v| *v.segment.margin == 0.));
    }

    #[test]
    fn empty_or_zero_input_gives_empty_bar() {
        assert!(share_bar(&[], GroupKey::Sector, &Colouring::plain("#fff")).is_empty());
        let shares = [GroupTotal::new("Code", 0.)];
        assert!(share_bar(&shares, GroupKey::Sector, &Colouring::plain("#fff")).is_empty());
    }
}

//! Fixed measure batteries, one per family.
//!
//! Each battery computes every measure of its family for one target in one
//! time unit and returns them as `(base name, score)` pairs in output order.
//! Suffixes (`-k10`, `-run2`) are added by the orchestrator.
//!
//! Abbreviations: c = compound, m = modifier, h = head, mh = pooled
//! modifier+head ("const" in diachronic names).

use crate::measure::*;
use crate::model::{Composites, Score, Target};
use crate::space::EmbeddingSpace;
use crate::Result;

/// A measure's base name and value.
pub type Measure = (&'static str, Score);

/// Direct cosines within one space.
pub fn synchronic_cosine<S: EmbeddingSpace + ?Sized>(target: &Target, space: &S) -> Vec<Measure> {
    let pooled = target.constituents();
    let vec_c = vector(&target.compound, space);
    let vec_m = vector(&target.modifier, space);
    let vec_h = vector(&target.head, space);
    let vec_mh = Probe::Pooled(&pooled).resolve(space);

    let cos_mh = cosine_similarity(vec_m, vec_h);
    let cos_cm = cosine_similarity(vec_c, vec_m);
    let cos_ch = cosine_similarity(vec_c, vec_h);
    let cos_cmh = cosine_similarity(vec_c, vec_mh.as_deref());
    let composite = Composites::of(cos_cm, cos_ch);

    vec![
        ("cpd-modif", cos_cm),
        ("cpd-head", cos_ch),
        ("cpd-const", cos_cmh),
        ("cpd-add", composite.add),
        ("cpd-mult", composite.mult),
        ("cpd-comb", composite.comb),
        ("modif-head", cos_mh),
    ]
}

/// Neighbor overlap and second-order similarity within one space.
pub fn synchronic_neighbor<S: EmbeddingSpace + ?Sized>(
    target: &Target,
    space: &S,
    k: usize,
    framing: Framing,
) -> Result<Vec<Measure>> {
    let pooled = target.constituents();
    let (c, m, h) = (
        Probe::Single(&target.compound),
        Probe::Single(&target.modifier),
        Probe::Single(&target.head),
    );
    let mh = Probe::Pooled(&pooled);

    let nns_c = neighbors_of(c, space, k);
    let nns_m = neighbors_of(m, space, k);
    let nns_h = neighbors_of(h, space, k);
    let nns_mh = neighbors_of(mh, space, k);

    // Overlap
    let overlap_mh = overlap(nns_m.as_ref(), nns_h.as_ref(), framing)?;
    let overlap_cm = overlap(nns_c.as_ref(), nns_m.as_ref(), framing)?;
    let overlap_ch = overlap(nns_c.as_ref(), nns_h.as_ref(), framing)?;
    let overlap_cmh = overlap(nns_c.as_ref(), nns_mh.as_ref(), framing)?;
    let overlap_comp = Composites::of(overlap_cm, overlap_ch);

    // Second order over the union of the two neighborhoods being compared
    let union_mh = union(nns_m.as_ref(), nns_h.as_ref())?;
    let union_cm = union(nns_c.as_ref(), nns_m.as_ref())?;
    let union_ch = union(nns_c.as_ref(), nns_h.as_ref())?;
    let union_cmh = union(nns_c.as_ref(), nns_mh.as_ref())?;

    let so = Framing::Similarity;
    let so_mh = second_order_within(m, h, union_mh.as_ref(), space, so);
    let so_cm = second_order_within(c, m, union_cm.as_ref(), space, so);
    let so_ch = second_order_within(c, h, union_ch.as_ref(), space, so);
    let so_cmh = second_order_within(c, mh, union_cmh.as_ref(), space, so);
    let so_comp = Composites::of(so_cm, so_ch);

    Ok(vec![
        ("syn-nn-overlap-cm", overlap_cm),
        ("syn-nn-overlap-ch", overlap_ch),
        ("syn-nn-overlap-cmh", overlap_cmh),
        ("syn-nn-overlap-add", overlap_comp.add),
        ("syn-nn-overlap-mult", overlap_comp.mult),
        ("syn-nn-overlap-comb", overlap_comp.comb),
        ("syn-nn-so-cm", so_cm),
        ("syn-nn-so-ch", so_ch),
        ("syn-nn-so-cmh", so_cmh),
        ("syn-nn-so-add", so_comp.add),
        ("syn-nn-so-mult", so_comp.mult),
        ("syn-nn-so-comb", so_comp.comb),
        ("syn-nn-overlap-mh", overlap_mh),
        ("syn-nn-so-mh", so_mh),
    ])
}

/// Cosine of the same probe in the earlier space and the aligned later one.
pub fn diachronic_cosine<S1, S2>(target: &Target, early: &S1, aligned_later: &S2) -> Vec<Measure>
where
    S1: EmbeddingSpace + ?Sized,
    S2: EmbeddingSpace + ?Sized,
{
    let pooled = target.constituents();
    let probes = [
        ("cpd-time", Probe::Single(&target.compound)),
        ("modif-time", Probe::Single(&target.modifier)),
        ("head-time", Probe::Single(&target.head)),
        ("const-time", Probe::Pooled(&pooled)),
    ];

    probes
        .into_iter()
        .map(|(name, probe)| {
            let v1 = probe.resolve(early);
            let v2 = probe.resolve(aligned_later);
            (name, cosine_similarity(v1.as_deref(), v2.as_deref()))
        })
        .collect()
}

/// Neighbor overlap and second-order similarity of the same probe across
/// two raw, unaligned spaces.
pub fn diachronic_neighbor<S1, S2>(
    target: &Target,
    early: &S1,
    later: &S2,
    k: usize,
    framing: Framing,
) -> Result<Vec<Measure>>
where
    S1: EmbeddingSpace + ?Sized,
    S2: EmbeddingSpace + ?Sized,
{
    const OVERLAP: [&str; 4] = ["nn-overlap-cpd", "nn-overlap-modif", "nn-overlap-head", "nn-overlap-const"];
    const SECOND_ORDER: [&str; 4] = ["nn-so-cpd", "nn-so-modif", "nn-so-head", "nn-so-const"];

    let pooled = target.constituents();
    let probes = [
        Probe::Single(&target.compound),
        Probe::Single(&target.modifier),
        Probe::Single(&target.head),
        Probe::Pooled(&pooled),
    ];

    let mut overlaps = Vec::with_capacity(probes.len());
    let mut second_orders = Vec::with_capacity(probes.len());
    for (i, probe) in probes.into_iter().enumerate() {
        let nns1 = neighbors_of(probe, early, k);
        let nns2 = neighbors_of(probe, later, k);
        overlaps.push((OVERLAP[i], overlap(nns1.as_ref(), nns2.as_ref(), framing)?));

        let shared = union(nns1.as_ref(), nns2.as_ref())?;
        let so = second_order_across(probe, shared.as_ref(), early, later, Framing::Similarity);
        second_orders.push((SECOND_ORDER[i], so));
    }

    overlaps.extend(second_orders);
    Ok(overlaps)
}

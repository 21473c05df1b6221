use crate::types::Amount;

/// `part * amount / total`, floored. A zero `total` yields zero.
pub fn safe_share(part: Amount, total: Amount, amount: Amount) -> Amount {
    if total == 0 {
        return 0;
    }
    let share = (part as u128) * (amount as u128) / (total as u128);
    share.min(Amount::MAX as u128) as Amount
}

/// Per-cycle reward pool: `reserve / emission_curve / cycles_per_year`,
/// rounded once to the nearest integer with ties going to the even neighbour.
pub fn block_reward(reserve: Amount, emission_curve: i64, cycles_per_year: i64) -> Amount {
    if emission_curve <= 0 || cycles_per_year <= 0 {
        return 0;
    }

    let numerator = reserve as u128;
    let denominator = (emission_curve as u128) * (cycles_per_year as u128);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    let doubled = remainder * 2;
    let rounded = if doubled > denominator || (doubled == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };

    rounded.min(Amount::MAX as u128) as Amount
}

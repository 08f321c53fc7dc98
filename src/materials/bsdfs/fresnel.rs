/// Schlick's approximation to the Fresnel reflectance of an unpolarized ray
/// crossing a dielectric boundary with relative index of refraction `eta`
/// (ratio of the incident medium's IOR to the transmitted medium's), at
/// incidence cosine `cos_theta`.
pub fn schlick_reflectance(cos_theta: f32, eta: f32) -> f32 {
    let r0 = (1.0 - eta) / (1.0 + eta);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normal_incidence_matches_r0() {
        let eta = 1.0 / 1.5;
        let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
        assert_abs_diff_eq!(schlick_reflectance(1.0, eta), r0, epsilon = 1e-6);
    }

    #[test]
    fn grazing_incidence_approaches_full_reflection() {
        assert_abs_diff_eq!(schlick_reflectance(0.0, 1.0 / 1.5), 1.0, epsilon = 1e-6);
    }
}

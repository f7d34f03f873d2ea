mod strip;
